// src/config.rs

//! Server configuration: loading, defaults, and the runtime-mutable knobs
//! consulted by the collection encodings.

use crate::core::ZirconError;
use crate::core::storage::list_object::ListLimits;
use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7878
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_clients() -> usize {
    10_000
}

fn default_databases() -> usize {
    16
}

fn default_list_max_ziplist_entries() -> usize {
    128
}

fn default_list_max_ziplist_value() -> usize {
    64
}

fn default_set_max_intset_entries() -> usize {
    512
}

/// The server's configuration. Loaded once from a TOML file at startup and
/// kept behind a mutex so `CONFIG SET` can mutate it at runtime; the encoding
/// knobs are re-read at each mutation, and lowering one never retroactively
/// promotes an existing container.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    #[serde(default = "default_databases")]
    pub databases: usize,
    /// A list stays in the packed encoding while it has at most this many elements.
    #[serde(default = "default_list_max_ziplist_entries")]
    pub list_max_ziplist_entries: usize,
    /// A list stays in the packed encoding while no string element exceeds this many bytes.
    #[serde(default = "default_list_max_ziplist_value")]
    pub list_max_ziplist_value: usize,
    /// A set stays in the integer-array encoding while it has at most this many elements.
    #[serde(default = "default_set_max_intset_entries")]
    pub set_max_intset_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: default_max_clients(),
            databases: default_databases(),
            list_max_ziplist_entries: default_list_max_ziplist_entries(),
            list_max_ziplist_value: default_list_max_ziplist_value(),
            set_max_intset_entries: default_set_max_intset_entries(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file, filling missing fields with
    /// defaults.
    pub fn load(path: &str) -> Result<Self, ZirconError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .map_err(|e| ZirconError::InvalidState(format!("Failed to read config: {e}")))?;
        settings
            .try_deserialize()
            .map_err(|e| ZirconError::InvalidState(format!("Failed to parse config: {e}")))
    }

    /// Snapshot of the packed-list bounds for one mutation.
    pub fn list_limits(&self) -> ListLimits {
        ListLimits {
            max_entries: self.list_max_ziplist_entries,
            max_value: self.list_max_ziplist_value,
        }
    }
}
