// src/core/commands/list/brpop.rs

//! Implements the `BRPOP` command.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_timeout};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PopDirection};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Represents the `BRPOP` command with its parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct BRPop {
    pub keys: Vec<Bytes>,
    pub timeout: Option<Duration>,
}

impl ParseCommand for BRPop {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        if args.len() < 2 {
            return Err(ZirconError::WrongArgumentCount("BRPOP".to_string()));
        }
        let timeout = extract_timeout(args.last().unwrap())?;
        let keys: Vec<Bytes> = args[..args.len() - 1]
            .iter()
            .map(extract_bytes)
            .collect::<Result<_, _>>()?;
        Ok(BRPop { keys, timeout })
    }
}

#[async_trait]
impl ExecutableCommand for BRPop {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = ctx.state.clone();
        state
            .blocker_manager
            .orchestrate_blocking_pop(ctx, &self.keys, PopDirection::Right, self.timeout)
            .await
    }
}

impl CommandSpec for BRPop {
    fn name(&self) -> &'static str {
        "brpop"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::NO_PROPAGATE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        self.keys.clone()
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        let mut args = self.keys.clone();
        args.push(
            self.timeout
                .map_or(0, |d| d.as_secs())
                .to_string()
                .into(),
        );
        args
    }
}
