// src/core/commands/command_trait.rs

//! Defines the core traits for all executable commands.

use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bitflags::bitflags;
use bytes::Bytes;

bitflags! {
    /// Flags that describe the properties and behavior of a command.
    /// These are used by the router and other subsystems to handle commands appropriately.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CommandFlags: u32 {
        /// The command modifies the dataset.
        const WRITE          = 1 << 0;
        /// The command only reads data.
        const READONLY       = 1 << 1;
        /// An administrative command.
        const ADMIN          = 1 << 2;
        /// The command should not be propagated to the event bus; it records
        /// its effects itself (or has none).
        const NO_PROPAGATE   = 1 << 3;
        /// A command related to transactions (e.g., `MULTI`, `EXEC`).
        const TRANSACTION    = 1 << 4;
    }
}

/// Represents the outcome of a write operation, used to determine if
/// propagation is necessary and to update the dirty key counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The command did not modify any data.
    DidNotWrite,
    /// The command modified one or more keys.
    Write { keys_modified: u64 },
    /// The command deleted one or more keys.
    Delete { keys_deleted: u64 },
    /// The command flushed the entire database.
    Flush,
}

impl WriteOutcome {
    /// Merges two `WriteOutcome` values, prioritizing more impactful outcomes.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Flush, _) | (_, Self::Flush) => Self::Flush,
            (Self::Delete { keys_deleted: k1 }, Self::Delete { keys_deleted: k2 }) => {
                Self::Delete {
                    keys_deleted: k1 + k2,
                }
            }
            (Self::Delete { keys_deleted: k1 }, Self::Write { keys_modified: k2 })
            | (Self::Write { keys_modified: k2 }, Self::Delete { keys_deleted: k1 }) => {
                Self::Delete {
                    keys_deleted: k1 + k2,
                }
            }
            (Self::Delete { keys_deleted }, Self::DidNotWrite)
            | (Self::DidNotWrite, Self::Delete { keys_deleted }) => Self::Delete { keys_deleted },

            (Self::Write { keys_modified: k1 }, Self::Write { keys_modified: k2 }) => Self::Write {
                keys_modified: k1 + k2,
            },
            (Self::Write { keys_modified }, Self::DidNotWrite)
            | (Self::DidNotWrite, Self::Write { keys_modified }) => Self::Write { keys_modified },

            (Self::DidNotWrite, Self::DidNotWrite) => Self::DidNotWrite,
        }
    }

    /// The number of keys this outcome touched, for the dirty counter.
    pub fn dirty_delta(&self) -> u64 {
        match self {
            Self::DidNotWrite => 0,
            Self::Write { keys_modified } => *keys_modified,
            Self::Delete { keys_deleted } => *keys_deleted,
            Self::Flush => 1,
        }
    }
}

/// A composite trait implemented on the main `Command` enum.
#[async_trait]
pub trait CommandExt {
    /// Returns the flags for the command.
    fn get_flags(&self) -> CommandFlags;
    /// Extracts the keys from the command's arguments.
    fn get_keys(&self) -> Vec<Bytes>;

    /// Executes the command within a given `ExecutionContext`.
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError>;
}

/// A trait for the actual execution logic of a command.
/// Implemented by each command's struct (e.g., `LPush`, `Sadd`).
#[async_trait]
pub trait ExecutableCommand {
    /// The core logic for the command's execution.
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError>;
}

/// A trait for parsing a command's arguments from a slice of `RespFrame`.
pub trait ParseCommand: Sized {
    /// Parses the arguments and returns an instance of the command struct.
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError>;
}
