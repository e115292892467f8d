// src/core/commands/command_spec.rs

//! Defines the `CommandSpec` trait, which provides metadata about a command.
//! The router uses it for key extraction and the propagation layer for
//! re-serializing a command onto the wire.

use crate::core::commands::command_trait::CommandFlags;
use bytes::Bytes;

/// A trait for describing a command's properties, such as its name, flags,
/// and how to extract keys from its arguments.
pub trait CommandSpec {
    /// The name of the command in lowercase.
    fn name(&self) -> &'static str;

    /// A bitmask of flags describing the command's behavior (e.g., `WRITE`, `READONLY`).
    fn flags(&self) -> CommandFlags;

    /// Extracts the key(s) from a parsed command instance.
    fn get_keys(&self) -> Vec<Bytes>;

    /// Converts the parsed command's arguments back into a vector of `Bytes`
    /// for serialization towards propagation consumers.
    fn to_resp_args(&self) -> Vec<Bytes>;
}
