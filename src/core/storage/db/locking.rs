// src/core/storage/db/locking.rs

use super::core::{Db, NUM_SHARDS};
use super::shard::ShardCache;
use crate::core::Command;
use crate::core::commands::command_trait::CommandExt;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::MutexGuard;

/// `ExecutionLocks` holds the necessary `MutexGuard`s for executing a command.
/// This enum allows the command execution layer to handle different locking strategies.
pub enum ExecutionLocks<'a> {
    /// A lock on a single database shard.
    Single {
        shard_index: usize,
        guard: MutexGuard<'a, ShardCache>,
    },
    /// Locks on multiple specific database shards.
    Multi {
        guards: BTreeMap<usize, MutexGuard<'a, ShardCache>>,
    },
    /// Locks on all database shards.
    All {
        guards: Vec<MutexGuard<'a, ShardCache>>,
    },
    /// No locks are required for this command.
    None,
}

impl Db {
    /// Determines and acquires the appropriate locks for a given command based
    /// on its type and the keys it operates on.
    pub async fn determine_locks_for_command<'a>(
        &'a self,
        command: &Command,
    ) -> ExecutionLocks<'a> {
        let keys = command.get_keys();

        match command {
            // `FLUSHDB` operates on the entire DB state and requires all locks.
            Command::FlushDb(_) => ExecutionLocks::All {
                guards: self.lock_all_shards().await,
            },

            // `DBSIZE` can operate without locks as it uses atomic counters.
            Command::DbSize(_) => ExecutionLocks::None,

            // Commands operating on multiple keys require locks on all relevant shards.
            _ if keys.len() > 1 => ExecutionLocks::Multi {
                guards: self.lock_shards_for_keys(&keys).await,
            },

            // Commands operating on a single key require a lock on its corresponding shard.
            _ if keys.len() == 1 => {
                let shard_index = self.get_shard_index(&keys[0]);
                ExecutionLocks::Single {
                    shard_index,
                    guard: self.get_shard(shard_index).entries.lock().await,
                }
            }

            // Default for commands with no keys.
            _ => ExecutionLocks::None,
        }
    }

    /// Locks multiple shards based on a list of keys, ensuring a consistent locking order
    /// by sorting shard indices to prevent deadlocks.
    pub async fn lock_shards_for_keys<'a>(
        &'a self,
        keys: &[Bytes],
    ) -> BTreeMap<usize, MutexGuard<'a, ShardCache>> {
        let indices: BTreeSet<usize> = keys.iter().map(|key| self.get_shard_index(key)).collect();
        let mut guards = BTreeMap::new();
        for index in indices {
            guards.insert(index, self.shards[index].entries.lock().await);
        }
        guards
    }

    /// Locks all shards in the database, in a fixed order (0 to NUM_SHARDS-1)
    /// to prevent deadlocks.
    pub async fn lock_all_shards<'a>(&'a self) -> Vec<MutexGuard<'a, ShardCache>> {
        let mut guards = Vec::with_capacity(NUM_SHARDS);
        for i in 0..NUM_SHARDS {
            guards.push(self.shards[i].entries.lock().await);
        }
        guards
    }
}
