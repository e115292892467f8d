// src/core/state/mod.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use crate::config::Config;
use crate::core::ZirconError;
use crate::core::blocking::BlockerManager;
use crate::core::events::EventBus;
use crate::core::storage::db::Db;
use crate::core::storage::list_object::ListLimits;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, broadcast};

/// Metadata tracked for every live client connection.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub connected_at: Instant,
}

/// Server-wide counters surfaced through `INFO`.
#[derive(Debug, Default)]
pub struct StatsState {
    total_connections: AtomicU64,
    total_commands: AtomicU64,
}

impl StatsState {
    pub fn increment_total_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_total_commands(&self) {
        self.total_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    pub fn total_commands(&self) -> u64 {
        self.total_commands.load(Ordering::Relaxed)
    }
}

/// The central struct holding all shared, server-wide state.
/// This struct is wrapped in an `Arc` and passed to nearly every task and
/// connection handler, providing a single source of truth for the server's
/// configuration and dynamic state.
#[derive(Debug)]
pub struct ServerState {
    /// A vector of all databases, each sharded internally.
    pub dbs: Vec<Arc<Db>>,
    /// A map of all active client connections, keyed by a unique session ID.
    pub clients: DashMap<u64, ClientInfo>,
    /// The server's runtime configuration, wrapped in a Mutex to allow for
    /// dynamic changes via the `CONFIG SET` command.
    pub config: Arc<Mutex<Config>>,
    /// Manages clients blocked on list commands (e.g., `BLPOP`).
    pub blocker_manager: Arc<BlockerManager>,
    /// The central event bus that propagates write commands.
    pub event_bus: Arc<EventBus>,
    /// Counter of keyspace modifications since startup.
    pub dirty: AtomicU64,
    /// Server-wide statistics.
    pub stats: StatsState,
    /// Broadcast channel used to signal a server-wide shutdown.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl ServerState {
    /// Initializes the entire server state from the given configuration.
    pub fn initialize(config: Config) -> Result<Arc<Self>, ZirconError> {
        if config.databases == 0 {
            return Err(ZirconError::InvalidState(
                "at least one database is required".into(),
            ));
        }
        let dbs = (0..config.databases).map(|_| Arc::new(Db::new())).collect();
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Arc::new(Self {
            dbs,
            clients: DashMap::new(),
            config: Arc::new(Mutex::new(config)),
            blocker_manager: Arc::new(BlockerManager::new()),
            event_bus: Arc::new(EventBus::new()),
            dirty: AtomicU64::new(0),
            stats: StatsState::default(),
            shutdown_tx,
        }))
    }

    pub fn get_db(&self, index: usize) -> Option<Arc<Db>> {
        self.dbs.get(index).cloned()
    }

    /// Snapshot of the packed-list bounds from the live configuration.
    pub async fn list_limits(&self) -> ListLimits {
        self.config.lock().await.list_limits()
    }

    /// Snapshot of the integer-set bound from the live configuration.
    pub async fn set_max_intset_entries(&self) -> usize {
        self.config.lock().await.set_max_intset_entries
    }

    /// Bumps the keyspace modification counter.
    pub fn add_dirty(&self, n: u64) {
        self.dirty.fetch_add(n, Ordering::Relaxed);
    }

    pub fn dirty(&self) -> u64 {
        self.dirty.load(Ordering::Relaxed)
    }
}
