// src/core/storage/db/core.rs

use super::shard::DbShard;
use super::transaction::TransactionState;
use bytes::Bytes;
use dashmap::DashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// The number of shards per database.
pub const NUM_SHARDS: usize = 16;

/// `Db` represents a single database, composed of multiple `DbShard`s.
#[derive(Debug)]
pub struct Db {
    /// The collection of shards that make up this database.
    pub shards: Vec<Arc<DbShard>>,
    /// The state of ongoing transactions, keyed by session ID.
    pub tx_states: Arc<DashMap<u64, TransactionState>>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PushDirection {
    Left,
    Right,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PopDirection {
    Left,
    Right,
}

impl Db {
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| Arc::new(DbShard::new())).collect();
        Self {
            shards,
            tx_states: Arc::new(DashMap::new()),
        }
    }

    /// Calculates the shard index for a given key using hashing.
    pub fn get_shard_index(&self, key: &Bytes) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    /// Returns the total number of keys in the database. O(1) complexity.
    pub fn get_key_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.key_count.load(Ordering::Relaxed))
            .sum()
    }

    /// Gets a reference to a shard by its index.
    pub fn get_shard(&self, index: usize) -> &Arc<DbShard> {
        &self.shards[index]
    }

    /// Calculates the total memory used by this database across all shards.
    pub fn get_current_memory(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.current_memory.load(Ordering::Relaxed))
            .sum()
    }

}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Db {
    fn clone(&self) -> Self {
        Self {
            shards: self.shards.clone(),
            tx_states: self.tx_states.clone(),
        }
    }
}
