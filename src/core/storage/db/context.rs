// src/core/storage/db/context.rs

use super::core::Db;
use super::locking::ExecutionLocks;
use super::shard::{DbShard, ShardCache};
use crate::core::Command;
use crate::core::ZirconError;
use crate::core::state::ServerState;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::MutexGuard;

/// `ExecutionContext` provides all the state and locks required to execute a `Command`.
pub struct ExecutionContext<'a> {
    pub state: Arc<ServerState>,
    pub locks: ExecutionLocks<'a>,
    pub db: &'a Db,
    /// The command being executed. Handlers that rewrite themselves for
    /// propagation (`SPOP` records a deterministic `SREM`) replace it here
    /// before returning; the router publishes whatever is left in the context.
    pub command: Option<Command>,
    pub session_id: u64,
    /// True while executing inside a `MULTI` block; blocking commands consult
    /// this to fail fast instead of parking the session.
    pub in_transaction: bool,
}

impl<'a> ExecutionContext<'a> {
    /// The shard and its held guard for an explicit key. Works for both the
    /// single-shard and multi-shard lock shapes.
    pub fn guard_for_key(
        &mut self,
        key: &Bytes,
    ) -> Result<(&'a Arc<DbShard>, &mut MutexGuard<'a, ShardCache>), ZirconError> {
        let shard_index = self.db.get_shard_index(key);
        let shard = self.db.get_shard(shard_index);
        match &mut self.locks {
            ExecutionLocks::Single {
                shard_index: held, guard,
            } => {
                if *held != shard_index {
                    return Err(ZirconError::LockingError(
                        "Held single-shard lock does not cover the requested key.".into(),
                    ));
                }
                Ok((shard, guard))
            }
            ExecutionLocks::Multi { guards } => {
                let guard = guards.get_mut(&shard_index).ok_or_else(|| {
                    ZirconError::LockingError("Required shard lock missing.".into())
                })?;
                Ok((shard, guard))
            }
            _ => Err(ZirconError::LockingError(
                "Command expected a single/multi shard lock.".into(),
            )),
        }
    }

    /// Releases all locks held by the context.
    pub fn release_locks(&mut self) {
        self.locks = ExecutionLocks::None;
    }
}
