// src/core/storage/db/transaction.rs

//! Per-session `MULTI`/`EXEC` queueing state.

use super::core::Db;
use crate::core::Command;
use crate::core::ZirconError;

/// The queued commands of one open `MULTI` block.
#[derive(Debug, Default, Clone)]
pub struct TransactionState {
    pub commands: Vec<Command>,
    /// Set when a queued command failed to parse; `EXEC` then aborts.
    pub has_error: bool,
}

impl Db {
    /// Opens a transaction for a session. Nested `MULTI` is a state error.
    pub fn begin_transaction(&self, session_id: u64) -> Result<(), ZirconError> {
        if self.tx_states.contains_key(&session_id) {
            return Err(ZirconError::InvalidState(
                "MULTI calls can not be nested".into(),
            ));
        }
        self.tx_states.insert(session_id, TransactionState::default());
        Ok(())
    }

    /// Appends a command to the session's open transaction.
    pub fn queue_command(&self, session_id: u64, command: Command) -> Result<(), ZirconError> {
        let mut tx = self
            .tx_states
            .get_mut(&session_id)
            .ok_or_else(|| ZirconError::InvalidState("QUEUE without MULTI".into()))?;
        tx.commands.push(command);
        Ok(())
    }

    /// Marks the session's open transaction as poisoned.
    pub fn poison_transaction(&self, session_id: u64) {
        if let Some(mut tx) = self.tx_states.get_mut(&session_id) {
            tx.has_error = true;
        }
    }

    /// Removes and returns the session's transaction state for `EXEC`.
    pub fn take_transaction(&self, session_id: u64) -> Option<TransactionState> {
        self.tx_states.remove(&session_id).map(|(_, tx)| tx)
    }

    /// Drops the session's transaction state for `DISCARD` or disconnect.
    pub fn discard_transaction(&self, session_id: u64) -> bool {
        self.tx_states.remove(&session_id).is_some()
    }
}
