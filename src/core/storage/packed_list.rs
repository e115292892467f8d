// src/core/storage/packed_list.rs

//! The compact list encoding: all elements live in one contiguous byte
//! buffer, each entry either an inline integer or a length-prefixed string.
//!
//! Entry layout:
//!
//! ```text
//! int entry: [tag=0][i64 LE, 8 bytes           ][total u32 LE]
//! str entry: [tag=1][len u32 LE][payload bytes  ][total u32 LE]
//! ```
//!
//! The trailing total length makes backward traversal possible: the entry
//! before offset `off` starts at `off - total`, where `total` is read from
//! the four bytes preceding `off`. A cursor is simply the byte offset of an
//! entry's tag; offsets before a mutated position stay valid across a delete,
//! which the removal scans rely on.

use crate::core::storage::value::{Value, parse_canonical_i64};

const TAG_INT: u8 = 0;
const TAG_STR: u8 = 1;

const INT_ENTRY_LEN: usize = 1 + 8 + 4;

/// One decoded entry, borrowed from the buffer or carried inline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PackedEntry<'a> {
    Str(&'a [u8]),
    Int(i64),
}

/// The packed list primitive. Small and cache-friendly; every structural
/// operation is O(n) in buffer bytes, which is the point of the size bounds
/// that gate this encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedList {
    buf: Vec<u8>,
    len: u32,
}

fn encode_entry(value: &Value) -> Vec<u8> {
    match value.as_int() {
        Some(n) => {
            let mut e = Vec::with_capacity(INT_ENTRY_LEN);
            e.push(TAG_INT);
            e.extend_from_slice(&n.to_le_bytes());
            e.extend_from_slice(&(INT_ENTRY_LEN as u32).to_le_bytes());
            e
        }
        None => {
            let payload = value.decoded();
            let total = 1 + 4 + payload.len() + 4;
            let mut e = Vec::with_capacity(total);
            e.push(TAG_STR);
            e.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            e.extend_from_slice(&payload);
            e.extend_from_slice(&(total as u32).to_le_bytes());
            e
        }
    }
}

impl PackedList {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total bytes used by the buffer, for memory accounting.
    pub fn memory_usage(&self) -> usize {
        self.buf.len()
    }

    fn entry_total_len(&self, off: usize) -> usize {
        match self.buf[off] {
            TAG_INT => INT_ENTRY_LEN,
            TAG_STR => {
                let len = u32::from_le_bytes(self.buf[off + 1..off + 5].try_into().unwrap());
                1 + 4 + len as usize + 4
            }
            _ => panic!("unknown packed list entry tag"),
        }
    }

    /// Reads the entry at `off`. `off` must be a valid cursor.
    pub fn get(&self, off: usize) -> PackedEntry<'_> {
        match self.buf[off] {
            TAG_INT => PackedEntry::Int(i64::from_le_bytes(
                self.buf[off + 1..off + 9].try_into().unwrap(),
            )),
            TAG_STR => {
                let len =
                    u32::from_le_bytes(self.buf[off + 1..off + 5].try_into().unwrap()) as usize;
                PackedEntry::Str(&self.buf[off + 5..off + 5 + len])
            }
            _ => panic!("unknown packed list entry tag"),
        }
    }

    /// Cursor of the first entry.
    pub fn head(&self) -> Option<usize> {
        (!self.is_empty()).then_some(0)
    }

    /// Cursor of the last entry.
    pub fn tail(&self) -> Option<usize> {
        if self.is_empty() { None } else { self.prev_from(self.buf.len()) }
    }

    /// Cursor of the entry following `off`.
    pub fn next(&self, off: usize) -> Option<usize> {
        let n = off + self.entry_total_len(off);
        (n < self.buf.len()).then_some(n)
    }

    /// Cursor of the entry preceding `off`.
    pub fn prev(&self, off: usize) -> Option<usize> {
        self.prev_from(off)
    }

    fn prev_from(&self, boundary: usize) -> Option<usize> {
        if boundary == 0 {
            return None;
        }
        let total =
            u32::from_le_bytes(self.buf[boundary - 4..boundary].try_into().unwrap()) as usize;
        Some(boundary - total)
    }

    /// Resolves a signed index to a cursor: `0` is the head, `-1` the tail.
    pub fn index(&self, idx: i64) -> Option<usize> {
        if idx >= 0 {
            let mut off = self.head()?;
            for _ in 0..idx {
                off = self.next(off)?;
            }
            Some(off)
        } else {
            let mut off = self.tail()?;
            for _ in 0..(-(idx + 1)) {
                off = self.prev(off)?;
            }
            Some(off)
        }
    }

    pub fn push_head(&mut self, value: &Value) {
        let entry = encode_entry(value);
        self.buf.splice(0..0, entry);
        self.len += 1;
    }

    pub fn push_tail(&mut self, value: &Value) {
        self.buf.extend_from_slice(&encode_entry(value));
        self.len += 1;
    }

    /// Inserts `value` so that it occupies the position of the entry currently
    /// at `off` (the old entry and everything after shift towards the tail).
    /// `off == buf end` appends.
    pub fn insert(&mut self, off: usize, value: &Value) {
        let entry = encode_entry(value);
        self.buf.splice(off..off, entry);
        self.len += 1;
    }

    /// Removes the entry at `off`. Returns the cursor of the entry that now
    /// occupies `off`, if any.
    pub fn delete(&mut self, off: usize) -> Option<usize> {
        let total = self.entry_total_len(off);
        self.buf.drain(off..off + total);
        self.len -= 1;
        (off < self.buf.len()).then_some(off)
    }

    /// Removes up to `count` entries starting at signed index `start`.
    pub fn delete_range(&mut self, start: i64, count: u32) {
        if count == 0 {
            return;
        }
        let Some(first) = self.index(start) else {
            return;
        };
        let mut end = first;
        let mut removed = 0u32;
        while removed < count {
            end += self.entry_total_len(end);
            removed += 1;
            if end >= self.buf.len() {
                break;
            }
        }
        self.buf.drain(first..end);
        self.len -= removed;
    }

    /// Byte-equality of the entry at `off` against a decoded string. Integer
    /// entries match when the string is their canonical rendering.
    pub fn compare(&self, off: usize, other: &[u8]) -> bool {
        match self.get(off) {
            PackedEntry::Str(b) => b == other,
            PackedEntry::Int(n) => parse_canonical_i64(other) == Some(n),
        }
    }
}
