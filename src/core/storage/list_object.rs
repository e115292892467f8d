// src/core/storage/list_object.rs

//! The dual-encoding List container: packed while small, a deque of value
//! objects once a size or value-shape bound is crossed. Promotion is one-way
//! for the lifetime of the key.

use crate::core::storage::db::{PopDirection, PushDirection};
use crate::core::storage::packed_list::{PackedEntry, PackedList};
use crate::core::storage::value::{Literal, Value};
use std::collections::VecDeque;

/// Snapshot of the packed-encoding bounds, taken from the live configuration
/// at each mutation.
#[derive(Debug, Clone, Copy)]
pub struct ListLimits {
    pub max_entries: usize,
    pub max_value: usize,
}

/// A List value: packed byte buffer or deque of value objects.
#[derive(Debug, Clone, PartialEq)]
pub enum ListObject {
    Packed(PackedList),
    Linked(VecDeque<Value>),
}

fn entry_to_value(entry: PackedEntry<'_>) -> Value {
    match entry {
        PackedEntry::Int(n) => Value::Int(n),
        PackedEntry::Str(b) => Value::try_encode(bytes::Bytes::copy_from_slice(b)),
    }
}

/// Resolves a signed element index against a length; `-1` is the last element.
pub fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    let resolved = if idx < 0 { idx + len as i64 } else { idx };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

impl ListObject {
    /// New lists always start packed.
    pub fn new_packed() -> Self {
        ListObject::Packed(PackedList::new())
    }

    pub fn is_packed(&self) -> bool {
        matches!(self, ListObject::Packed(_))
    }

    pub fn encoding_name(&self) -> &'static str {
        match self {
            ListObject::Packed(_) => "ziplist",
            ListObject::Linked(_) => "linkedlist",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListObject::Packed(pl) => pl.len() as usize,
            ListObject::Linked(dll) => dll.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Promotes when the value's shape alone requires it: a non-integer value
    /// longer than the packed bound cannot live in the packed encoding.
    pub fn try_convert_for(&mut self, value: &Value, limits: &ListLimits) {
        if self.is_packed() && value.as_int().is_none() && value.decoded_len() > limits.max_value {
            self.convert_to_linked();
        }
    }

    pub fn push(&mut self, value: Value, dir: PushDirection, limits: &ListLimits) {
        self.try_convert_for(&value, limits);
        let over_bound = match &*self {
            ListObject::Packed(pl) => pl.len() as usize >= limits.max_entries,
            ListObject::Linked(_) => false,
        };
        if over_bound {
            self.convert_to_linked();
        }
        match self {
            ListObject::Packed(pl) => match dir {
                PushDirection::Left => pl.push_head(&value),
                PushDirection::Right => pl.push_tail(&value),
            },
            ListObject::Linked(dll) => match dir {
                PushDirection::Left => dll.push_front(value),
                PushDirection::Right => dll.push_back(value),
            },
        }
    }

    pub fn pop(&mut self, dir: PopDirection) -> Option<Value> {
        match self {
            ListObject::Packed(pl) => {
                let off = match dir {
                    PopDirection::Left => pl.head(),
                    PopDirection::Right => pl.tail(),
                }?;
                let value = entry_to_value(pl.get(off));
                pl.delete(off);
                Some(value)
            }
            ListObject::Linked(dll) => match dir {
                PopDirection::Left => dll.pop_front(),
                PopDirection::Right => dll.pop_back(),
            },
        }
    }

    /// The element at a signed index, materialized.
    pub fn get(&self, idx: i64) -> Option<Value> {
        match self {
            ListObject::Packed(pl) => pl.index(idx).map(|off| entry_to_value(pl.get(off))),
            ListObject::Linked(dll) => resolve_index(idx, dll.len()).and_then(|i| dll.get(i).cloned()),
        }
    }

    /// Replaces the element at a signed index. Returns false when the index
    /// does not address an element.
    pub fn set(&mut self, idx: i64, value: Value, limits: &ListLimits) -> bool {
        self.try_convert_for(&value, limits);
        match self {
            ListObject::Packed(pl) => {
                let Some(off) = pl.index(idx) else {
                    return false;
                };
                pl.delete(off);
                pl.insert(off, &value);
                true
            }
            ListObject::Linked(dll) => {
                let Some(i) = resolve_index(idx, dll.len()) else {
                    return false;
                };
                dll[i] = value;
                true
            }
        }
    }

    /// Lazy forward iteration producing literals. Invalidated by any mutation
    /// of the container.
    pub fn iter(&self) -> ListIter<'_> {
        match self {
            ListObject::Packed(pl) => ListIter::Packed { pl, off: pl.head() },
            ListObject::Linked(dll) => ListIter::Linked(dll.iter()),
        }
    }

    /// Packed to linked is the only legal conversion; requesting any other is
    /// a programming error.
    pub fn convert_to_linked(&mut self) {
        match self {
            ListObject::Packed(pl) => {
                let mut dll = VecDeque::with_capacity(pl.len() as usize);
                let mut cursor = pl.head();
                while let Some(off) = cursor {
                    dll.push_back(entry_to_value(pl.get(off)));
                    cursor = pl.next(off);
                }
                *self = ListObject::Linked(dll);
            }
            ListObject::Linked(_) => panic!("unsupported list conversion"),
        }
    }

    pub fn memory_usage(&self) -> usize {
        match self {
            ListObject::Packed(pl) => pl.memory_usage(),
            ListObject::Linked(dll) => dll
                .iter()
                .map(|v| v.decoded_len() + std::mem::size_of::<Value>())
                .sum(),
        }
    }
}

/// Forward iterator over a list, agnostic of the underlying encoding.
pub enum ListIter<'a> {
    Packed {
        pl: &'a PackedList,
        off: Option<usize>,
    },
    Linked(std::collections::vec_deque::Iter<'a, Value>),
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Literal<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ListIter::Packed { pl, off } => {
                let cur = (*off)?;
                let lit = match pl.get(cur) {
                    PackedEntry::Int(n) => Literal::Int(n),
                    PackedEntry::Str(b) => Literal::Bytes(b),
                };
                *off = pl.next(cur);
                Some(lit)
            }
            ListIter::Linked(iter) => iter.next().map(Literal::from),
        }
    }
}
