// src/core/storage/data_types.rs

//! Defines the core data structures for storing values in the database,
//! such as `StoredValue` and the `DataValue` enum.

use crate::core::storage::list_object::ListObject;
use crate::core::storage::set_object::SetObject;

/// A wrapper for all values stored in the database, containing the data and
/// its accounting metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    pub data: DataValue,
    /// The calculated size of the `data` field in bytes.
    pub size: usize,
}

impl StoredValue {
    /// Creates a new `StoredValue` with freshly computed size metadata.
    pub fn new(data: DataValue) -> Self {
        let size = data.memory_usage();
        Self { data, size }
    }

    /// Recomputes the cached size after an in-place mutation of `data` and
    /// returns the delta for the shard's memory counter.
    pub fn refresh_size(&mut self) -> isize {
        let new_size = self.data.memory_usage();
        let delta = new_size as isize - self.size as isize;
        self.size = new_size;
        delta
    }

    /// Returns the total memory usage of this stored value in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.size
    }
}

/// An enum representing the different data types that can be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    List(ListObject),
    Set(SetObject),
}

impl DataValue {
    /// Calculates the memory usage of the data payload.
    pub fn memory_usage(&self) -> usize {
        match self {
            DataValue::List(l) => l.memory_usage(),
            DataValue::Set(s) => s.memory_usage(),
        }
    }

    /// The datatype name as reported by `TYPE`.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::List(_) => "list",
            DataValue::Set(_) => "set",
        }
    }

    /// The internal encoding name as reported by `OBJECT ENCODING`.
    pub fn encoding_name(&self) -> &'static str {
        match self {
            DataValue::List(l) => l.encoding_name(),
            DataValue::Set(s) => s.encoding_name(),
        }
    }

    /// Element count, regardless of datatype.
    pub fn len(&self) -> usize {
        match self {
            DataValue::List(l) => l.len(),
            DataValue::Set(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
