// src/core/commands/generic/transaction.rs

//! `MULTI`, `EXEC`, and `DISCARD` markers. These never reach the normal
//! execution path: the session router intercepts them to manage per-session
//! queueing state.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::validate_arg_count;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

macro_rules! transaction_marker {
    ($struct_name:ident, $upper:literal, $lower:literal) => {
        #[derive(Debug, Clone, Default)]
        pub struct $struct_name;

        impl ParseCommand for $struct_name {
            fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
                validate_arg_count(args, 0, $upper)?;
                Ok($struct_name)
            }
        }

        #[async_trait]
        impl ExecutableCommand for $struct_name {
            async fn execute<'a>(
                &self,
                _ctx: &mut ExecutionContext<'a>,
            ) -> Result<(RespValue, WriteOutcome), ZirconError> {
                Err(ZirconError::Internal(
                    concat!($upper, " is handled by the session router").to_string(),
                ))
            }
        }

        impl CommandSpec for $struct_name {
            fn name(&self) -> &'static str {
                $lower
            }
            fn flags(&self) -> CommandFlags {
                CommandFlags::TRANSACTION | CommandFlags::NO_PROPAGATE
            }
            fn get_keys(&self) -> Vec<Bytes> {
                vec![]
            }
            fn to_resp_args(&self) -> Vec<Bytes> {
                vec![]
            }
        }
    };
}

transaction_marker!(Multi, "MULTI", "multi");
transaction_marker!(Exec, "EXEC", "exec");
transaction_marker!(Discard, "DISCARD", "discard");
