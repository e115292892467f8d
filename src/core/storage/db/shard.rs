// src/core/storage/db/shard.rs

//! Defines the `DbShard` and `ShardCache` structs, which form the fundamental
//! storage units within a `Db`.

use crate::core::storage::data_types::StoredValue;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A `DbShard` is a single, concurrent slice of the database.
/// It contains a mutex-guarded `ShardCache` and atomic counters for performance.
#[derive(Debug)]
pub struct DbShard {
    /// The actual key-value store, protected by a Mutex for thread-safe access.
    pub entries: Mutex<ShardCache>,
    /// An atomic counter for the total memory used by this shard in bytes.
    pub current_memory: Arc<AtomicUsize>,
    /// An atomic counter for the total number of keys in this shard.
    pub key_count: Arc<AtomicUsize>,
}

/// A `ShardCache` wraps the key-value map and manages the associated memory
/// and key-count accounting.
#[derive(Debug)]
pub struct ShardCache {
    store: HashMap<Bytes, StoredValue>,
    /// A shared atomic counter for the shard's total memory usage.
    memory_counter: Arc<AtomicUsize>,
    /// A shared atomic counter for the shard's total key count.
    key_counter: Arc<AtomicUsize>,
}

impl DbShard {
    pub(super) fn new() -> Self {
        let current_memory = Arc::new(AtomicUsize::new(0));
        let key_count = Arc::new(AtomicUsize::new(0));
        Self {
            entries: Mutex::new(ShardCache::new(current_memory.clone(), key_count.clone())),
            current_memory,
            key_count,
        }
    }

    /// Atomically updates the shard's memory counter by a given delta.
    pub fn update_memory(&self, diff: isize) {
        if diff > 0 {
            self.current_memory
                .fetch_add(diff as usize, Ordering::Relaxed);
        } else {
            self.current_memory
                .fetch_sub((-diff) as usize, Ordering::Relaxed);
        }
    }
}

impl ShardCache {
    fn new(memory_counter: Arc<AtomicUsize>, key_counter: Arc<AtomicUsize>) -> Self {
        Self {
            store: HashMap::new(),
            memory_counter,
            key_counter,
        }
    }

    /// Puts a key-value pair into the cache, handling all memory and key count
    /// accounting. It returns the old value if the key already existed.
    pub fn put(&mut self, key: Bytes, mut value: StoredValue) -> Option<StoredValue> {
        value.size = value.data.memory_usage();
        let new_item_mem = key.len() + value.size;

        let old_value = self.store.insert(key.clone(), value);

        if let Some(ref old) = old_value {
            let old_item_mem = key.len() + old.size;
            self.update_memory(new_item_mem as isize - old_item_mem as isize);
        } else {
            self.update_memory(new_item_mem as isize);
            self.key_counter.fetch_add(1, Ordering::Relaxed);
        }
        old_value
    }

    /// Removes a key from the cache, returning the value if the key was present.
    /// This method handles all necessary memory and key count decrements.
    pub fn pop(&mut self, key: &Bytes) -> Option<StoredValue> {
        if let Some(popped_value) = self.store.remove(key) {
            let mem_to_free = key.len() + popped_value.size;
            self.update_memory(-(mem_to_free as isize));
            self.key_counter.fetch_sub(1, Ordering::Relaxed);
            Some(popped_value)
        } else {
            None
        }
    }

    fn update_memory(&self, diff: isize) {
        if diff > 0 {
            self.memory_counter
                .fetch_add(diff as usize, Ordering::Relaxed);
        } else {
            self.memory_counter
                .fetch_sub((-diff) as usize, Ordering::Relaxed);
        }
    }

    /// Clears all entries from the shard, resetting memory and key counters.
    pub fn clear(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.store.clear();
        self.memory_counter.store(0, Ordering::Relaxed);
        self.key_counter.store(0, Ordering::Relaxed);
    }

    /// Gets a mutable reference to a value, inserting a default if it doesn't exist.
    pub fn get_or_insert_with_mut<F>(&mut self, key: Bytes, f: F) -> &mut StoredValue
    where
        F: FnOnce() -> StoredValue,
    {
        if !self.store.contains_key(&key) {
            let new_value = f();
            self.put(key.clone(), new_value);
        }
        self.store.get_mut(&key).unwrap()
    }

    /// Gets a mutable reference to a value.
    pub fn get_mut(&mut self, key: &Bytes) -> Option<&mut StoredValue> {
        self.store.get_mut(key)
    }

    /// Gets an immutable reference to a value.
    pub fn peek(&self, key: &Bytes) -> Option<&StoredValue> {
        self.store.get(key)
    }
}
