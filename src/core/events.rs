// src/core/events.rs

//! Defines the event bus that propagates write operations towards persistence
//! and replication consumers. Nothing in this build consumes it durably, but
//! every write command publishes through it, and the tests observe it to
//! verify propagation rewrites (e.g. `SPOP` logging as `SREM`).

use crate::core::Command;
use tokio::sync::broadcast::{self, Sender as BroadcastSender};
use tracing::debug;

/// The capacity of the broadcast channel.
/// This should be large enough to handle bursts of commands without lagging.
const BROADCAST_BUS_CAPACITY: usize = 16384;

/// Defines an atomic unit of work that is propagated to subscribers.
#[derive(Debug, Clone)]
pub enum UnitOfWork {
    /// A single command. Boxed to optimize the size of the enum.
    Command(Box<Command>),
    /// A group of commands that must be applied together, e.g. the synthetic
    /// push+pop pair recorded when a pushed value is handed straight to a
    /// blocked client.
    Transaction(Vec<Command>),
}

/// The `EventBus` is the central distribution hub for all write operations.
#[derive(Debug)]
pub struct EventBus {
    sender: BroadcastSender<UnitOfWork>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_BUS_CAPACITY);
        Self { sender }
    }

    /// Publishes a `UnitOfWork` to all subscribers. It's okay if there are none.
    pub fn publish(&self, uow: UnitOfWork) {
        if self.sender.send(uow).is_err() {
            debug!("Published a UnitOfWork with no active subscribers.");
        }
    }

    /// Provides a new receiver to observe propagated writes.
    pub fn subscribe(&self) -> broadcast::Receiver<UnitOfWork> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
