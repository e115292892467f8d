// src/core/commands/generic/mod.rs

//! Generic commands: keyspace operations, introspection, configuration, and
//! the transaction markers.

pub mod config_cmd;
pub mod dbsize;
pub mod del;
pub mod echo;
pub mod exists;
pub mod flushdb;
pub mod info;
pub mod object;
pub mod ping;
pub mod transaction;
pub mod type_info;

pub use config_cmd::{ConfigAction, ConfigGetSet};
pub use dbsize::DbSize;
pub use del::Del;
pub use echo::Echo;
pub use exists::Exists;
pub use flushdb::FlushDb;
pub use info::Info;
pub use object::Object;
pub use ping::Ping;
pub use transaction::{Discard, Exec, Multi};
pub use type_info::TypeInfo;
