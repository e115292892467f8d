// src/connection/guard.rs

//! RAII registration of a client connection with the server state.

use crate::core::state::{ClientInfo, ServerState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Registers the session on creation and tears down everything the session
/// may have left behind on drop: the client table entry, any blocking-pop
/// registrations, and an open transaction. A client disconnecting while
/// blocked must not leave dangling waiters in the registry.
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    session_id: u64,
}

impl ConnectionGuard {
    pub fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        state.clients.insert(
            session_id,
            ClientInfo {
                addr,
                connected_at: Instant::now(),
            },
        );
        state.stats.increment_total_connections();
        Self { state, session_id }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.state.clients.remove(&self.session_id);
        self.state
            .blocker_manager
            .remove_waiters_for_session(self.session_id);
        for db in &self.state.dbs {
            if db.discard_transaction(self.session_id) {
                debug!(
                    "Discarded open transaction for disconnected session {}",
                    self.session_id
                );
            }
        }
    }
}
