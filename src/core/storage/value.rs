// src/core/storage/value.rs

//! The element value type shared by all collections, and the transient
//! `Literal` view produced by container iteration.

use bytes::Bytes;
use std::hash::{Hash, Hasher};

/// Parses `raw` as a canonical base-10 `i64` rendering. "42" and "-7" parse;
/// "042", "+1", " 1" and anything that does not round-trip do not. Containers
/// rely on this to decide whether a value may live in an integer encoding.
pub fn parse_canonical_i64(raw: &[u8]) -> Option<i64> {
    if raw.is_empty() || raw.len() > 20 {
        return None;
    }
    let s = std::str::from_utf8(raw).ok()?;
    let n: i64 = s.parse().ok()?;
    let mut buf = itoa::Buffer::new();
    (buf.format(n).as_bytes() == raw).then_some(n)
}

/// An element stored in a collection: either an integer or a byte string.
///
/// `Bytes` provides cheap shared ownership, so cloning a `Value` never copies
/// the payload. Equality and hashing are defined over the *decoded* byte form,
/// so `Int(42)` and `Str("42")` are the same element.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Str(Bytes),
}

impl Value {
    /// Substitutes the integer form when the content is the canonical decimal
    /// rendering of an `i64`; otherwise keeps the raw bytes.
    pub fn try_encode(raw: Bytes) -> Self {
        match parse_canonical_i64(&raw) {
            Some(n) => Value::Int(n),
            None => Value::Str(raw),
        }
    }

    /// The integer form, if this value has one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(b) => parse_canonical_i64(b),
        }
    }

    /// Materializes the byte-string form.
    pub fn decoded(&self) -> Bytes {
        match self {
            Value::Int(n) => {
                let mut buf = itoa::Buffer::new();
                Bytes::copy_from_slice(buf.format(*n).as_bytes())
            }
            Value::Str(b) => b.clone(),
        }
    }

    /// Length in bytes of the decoded form, for memory accounting.
    pub fn decoded_len(&self) -> usize {
        match self {
            Value::Int(n) => itoa::Buffer::new().format(*n).len(),
            Value::Str(b) => b.len(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(n), Value::Str(b)) | (Value::Str(b), Value::Int(n)) => {
                let mut buf = itoa::Buffer::new();
                buf.format(*n).as_bytes() == &b[..]
            }
        }
    }
}

impl Eq for Value {}

// Hash over the decoded byte form so it agrees with `PartialEq` across the
// integer/string boundary.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Int(n) => {
                let mut buf = itoa::Buffer::new();
                state.write(buf.format(*n).as_bytes());
            }
            Value::Str(b) => state.write(b),
        }
    }
}

/// A transient view of one element produced by container iteration.
///
/// It is either a non-owning borrow of bytes inside a packed container, a bare
/// integer, or an owned value object materialized on demand. The owned case
/// replaces the C-level "dirty literal" bookkeeping: whatever a literal owns
/// is released when it goes out of scope.
#[derive(Debug, Clone)]
pub enum Literal<'a> {
    Bytes(&'a [u8]),
    Int(i64),
    Owned(Value),
}

impl Literal<'_> {
    /// Fast path: the integer form without materializing a value object.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(n) => Some(*n),
            Literal::Bytes(b) => parse_canonical_i64(b),
            Literal::Owned(v) => v.as_int(),
        }
    }

    /// Materializes an owned value object from this view.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(n) => Value::Int(*n),
            Literal::Bytes(b) => Value::try_encode(Bytes::copy_from_slice(b)),
            Literal::Owned(v) => v.clone(),
        }
    }

    /// Materializes the decoded byte form.
    pub fn decoded(&self) -> Bytes {
        match self {
            Literal::Int(n) => {
                let mut buf = itoa::Buffer::new();
                Bytes::copy_from_slice(buf.format(*n).as_bytes())
            }
            Literal::Bytes(b) => Bytes::copy_from_slice(b),
            Literal::Owned(v) => v.decoded(),
        }
    }

    /// Byte-equality against a value object's decoded form.
    pub fn eq_value(&self, other: &Value) -> bool {
        match self {
            Literal::Int(n) => Value::Int(*n) == *other,
            Literal::Owned(v) => v == other,
            Literal::Bytes(b) => match other {
                Value::Str(ob) => *b == &ob[..],
                Value::Int(n) => {
                    let mut buf = itoa::Buffer::new();
                    buf.format(*n).as_bytes() == *b
                }
            },
        }
    }
}

impl From<Value> for Literal<'static> {
    fn from(v: Value) -> Self {
        match v {
            Value::Int(n) => Literal::Int(n),
            other => Literal::Owned(other),
        }
    }
}

impl<'a> From<&'a Value> for Literal<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Int(n) => Literal::Int(*n),
            Value::Str(b) => Literal::Bytes(&b[..]),
        }
    }
}
