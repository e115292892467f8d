// src/core/storage/set_object.rs

//! The dual-encoding Set container: a sorted integer array while every member
//! is integer-encodable and small enough, a hash table afterwards. Promotion
//! is one-way for the lifetime of the key.

use crate::core::storage::int_set::IntSet;
use crate::core::storage::value::{Literal, Value};
use indexmap::IndexSet;
use rand::Rng;

/// A Set value: integer array or hash table of value objects.
///
/// `IndexSet` plays the hash-table role: stable iteration order across a
/// single traversal, index-addressable for uniform random sampling, and
/// pre-sizable so promotion does not rehash per element.
#[derive(Debug, Clone, PartialEq)]
pub enum SetObject {
    Ints(IntSet),
    Hash(IndexSet<Value>),
}

impl SetObject {
    /// Factory: a set that can hold `value` without immediate promotion.
    pub fn create_for(value: &Value) -> Self {
        if value.as_int().is_some() {
            SetObject::Ints(IntSet::new())
        } else {
            SetObject::Hash(IndexSet::new())
        }
    }

    /// Temporary result sets for the algebra commands start in the compact
    /// encoding and promote as elements arrive.
    pub fn new_ints() -> Self {
        SetObject::Ints(IntSet::new())
    }

    pub fn encoding_name(&self) -> &'static str {
        match self {
            SetObject::Ints(_) => "intset",
            SetObject::Hash(_) => "hashtable",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SetObject::Ints(is) => is.len(),
            SetObject::Hash(ht) => ht.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts if absent. Promotes when the element is not integer-encodable
    /// or the insertion crosses the integer-array bound.
    pub fn add(&mut self, ele: &Literal<'_>, max_intset_entries: usize) -> bool {
        match self {
            SetObject::Ints(is) => {
                if let Some(n) = ele.as_int() {
                    if !is.add(n) {
                        return false;
                    }
                    if is.len() > max_intset_entries {
                        self.convert_to_hash();
                    }
                    true
                } else {
                    // The set *was* an intset, so a non-integer element is
                    // necessarily absent after conversion.
                    self.convert_to_hash();
                    let SetObject::Hash(ht) = self else {
                        unreachable!()
                    };
                    ht.insert(ele.to_value())
                }
            }
            SetObject::Hash(ht) => ht.insert(ele.to_value()),
        }
    }

    /// Deletes if present.
    pub fn remove(&mut self, ele: &Literal<'_>) -> bool {
        match self {
            SetObject::Ints(is) => match ele.as_int() {
                Some(n) => is.remove(n),
                None => false,
            },
            SetObject::Hash(ht) => ht.swap_remove(&ele.to_value()),
        }
    }

    /// Membership test. In the integer encoding a non-integer literal is
    /// trivially absent; in the hash encoding the literal is materialized.
    pub fn contains(&self, ele: &Literal<'_>) -> bool {
        match self {
            SetObject::Ints(is) => ele.as_int().is_some_and(|n| is.contains(n)),
            SetObject::Hash(ht) => ht.contains(&ele.to_value()),
        }
    }

    /// A uniformly random member, cheaply cloned.
    pub fn random_member<R: Rng>(&self, rng: &mut R) -> Option<Value> {
        match self {
            SetObject::Ints(is) => is.random(rng).map(Value::Int),
            SetObject::Hash(ht) => {
                if ht.is_empty() {
                    return None;
                }
                ht.get_index(rng.gen_range(0..ht.len())).cloned()
            }
        }
    }

    /// Lazy forward iteration producing literals.
    pub fn iter(&self) -> SetIter<'_> {
        match self {
            SetObject::Ints(is) => SetIter::Ints { is, idx: 0 },
            SetObject::Hash(ht) => SetIter::Hash(ht.iter()),
        }
    }

    /// Integer array to hash table is the only legal conversion. The table is
    /// presized to the current cardinality so the rebuild does not rehash.
    pub fn convert_to_hash(&mut self) {
        match self {
            SetObject::Ints(is) => {
                let mut ht = IndexSet::with_capacity(is.len());
                for n in is.iter() {
                    ht.insert(Value::Int(n));
                }
                *self = SetObject::Hash(ht);
            }
            SetObject::Hash(_) => panic!("unsupported set conversion"),
        }
    }

    pub fn memory_usage(&self) -> usize {
        match self {
            SetObject::Ints(is) => is.memory_usage(),
            SetObject::Hash(ht) => ht
                .iter()
                .map(|v| v.decoded_len() + std::mem::size_of::<Value>())
                .sum(),
        }
    }
}

/// Forward iterator over a set, agnostic of the underlying encoding.
pub enum SetIter<'a> {
    Ints { is: &'a IntSet, idx: usize },
    Hash(indexmap::set::Iter<'a, Value>),
}

impl<'a> Iterator for SetIter<'a> {
    type Item = Literal<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SetIter::Ints { is, idx } => {
                let n = is.get(*idx)?;
                *idx += 1;
                Some(Literal::Int(n))
            }
            SetIter::Hash(iter) => iter.next().map(Literal::from),
        }
    }
}
