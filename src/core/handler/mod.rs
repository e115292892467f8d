// src/core/handler/mod.rs

//! The central component for routing parsed commands to their handlers.
//!
//! The `Router` receives a parsed `Command` from the `ConnectionHandler` and
//! either queues it (inside an open `MULTI` block), intercepts it (the
//! transaction markers), or executes it: acquire the shard locks the command
//! needs, run it, bump the dirty counter, and publish the write to the event
//! bus. Handlers that rewrite themselves for propagation leave the rewritten
//! command in the execution context.

use crate::connection::SessionState;
use crate::core::commands::command_trait::{CommandExt, CommandFlags, WriteOutcome};
use crate::core::events::UnitOfWork;
use crate::core::state::ServerState;
use crate::core::storage::db::{Db, ExecutionContext, ExecutionLocks};
use crate::core::{Command, RespValue, ZirconError};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Routes one command for one session.
pub struct Router<'a> {
    state: Arc<ServerState>,
    session_id: u64,
    session: &'a mut SessionState,
}

impl<'a> Router<'a> {
    pub fn new(state: Arc<ServerState>, session_id: u64, session: &'a mut SessionState) -> Self {
        Self {
            state,
            session_id,
            session,
        }
    }

    /// The main entry point for routing a command.
    pub async fn route(&mut self, command: Command) -> Result<RespValue, ZirconError> {
        self.state.stats.increment_total_commands();
        let db = self
            .state
            .get_db(self.session.db_index)
            .ok_or_else(|| ZirconError::Internal("selected database missing".into()))?;

        match command {
            Command::Multi(_) => {
                db.begin_transaction(self.session_id)?;
                self.session.in_transaction = true;
                Ok(RespValue::ok())
            }
            Command::Discard(_) => {
                if !self.session.in_transaction {
                    return Err(ZirconError::InvalidState("DISCARD without MULTI".into()));
                }
                db.discard_transaction(self.session_id);
                self.session.in_transaction = false;
                Ok(RespValue::ok())
            }
            Command::Exec(_) => {
                if !self.session.in_transaction {
                    return Err(ZirconError::InvalidState("EXEC without MULTI".into()));
                }
                self.session.in_transaction = false;
                self.exec_transaction(&db).await
            }
            queued if self.session.in_transaction => {
                db.queue_command(self.session_id, queued)?;
                Ok(RespValue::SimpleString("QUEUED".to_string()))
            }
            other => self.execute_normal(other, &db).await,
        }
    }

    /// Executes a single command outside a transaction.
    async fn execute_normal(
        &self,
        command: Command,
        db: &Db,
    ) -> Result<RespValue, ZirconError> {
        let locks = db.determine_locks_for_command(&command).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks,
            db,
            command: Some(command.clone()),
            session_id: self.session_id,
            in_transaction: false,
        };
        let (resp, outcome) = command.execute(&mut ctx).await?;
        let executed = ctx.command.take().unwrap_or(command);
        drop(ctx);

        self.record_write(executed, outcome);
        Ok(resp)
    }

    /// Runs the queued commands of `EXEC` back to back under the union of
    /// their shard locks, collecting per-command replies.
    async fn exec_transaction(&self, db: &Db) -> Result<RespValue, ZirconError> {
        let Some(tx) = db.take_transaction(self.session_id) else {
            return Err(ZirconError::InvalidState("EXEC without MULTI".into()));
        };
        if tx.has_error {
            return Err(ZirconError::ExecAborted);
        }

        let all_keys: Vec<Bytes> = tx.commands.iter().flat_map(|c| c.get_keys()).collect();
        let guards = db.lock_shards_for_keys(&all_keys).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks: ExecutionLocks::Multi { guards },
            db,
            command: None,
            session_id: self.session_id,
            in_transaction: true,
        };

        let mut replies = Vec::with_capacity(tx.commands.len());
        let mut write_commands = Vec::new();
        let mut total_dirty = 0u64;
        for command in tx.commands {
            ctx.command = Some(command.clone());
            match command.execute(&mut ctx).await {
                Ok((resp, outcome)) => {
                    if outcome != WriteOutcome::DidNotWrite {
                        total_dirty += outcome.dirty_delta();
                        if !command.get_flags().contains(CommandFlags::NO_PROPAGATE) {
                            write_commands.push(ctx.command.take().unwrap_or(command));
                        }
                    }
                    replies.push(resp);
                }
                Err(e) => {
                    debug!("Command inside EXEC failed: {e}");
                    replies.push(RespValue::Error(e.to_resp_string()));
                }
            }
        }
        drop(ctx);

        if total_dirty > 0 {
            self.state.add_dirty(total_dirty);
        }
        if !write_commands.is_empty() {
            self.state
                .event_bus
                .publish(UnitOfWork::Transaction(write_commands));
        }
        Ok(RespValue::Array(replies))
    }

    /// Dirty accounting and propagation for a completed write.
    fn record_write(&self, executed: Command, outcome: WriteOutcome) {
        if outcome == WriteOutcome::DidNotWrite {
            return;
        }
        self.state.add_dirty(outcome.dirty_delta());
        if !executed.get_flags().contains(CommandFlags::NO_PROPAGATE) {
            self.state
                .event_bus
                .publish(UnitOfWork::Command(Box::new(executed)));
        }
    }
}
