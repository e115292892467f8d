// src/core/commands/list/brpoplpush.rs

//! Implements the `BRPOPLPUSH` command: block on the source list, then
//! atomically move the delivered element into the destination list.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_timeout, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct BRPopLPush {
    pub source: Bytes,
    pub destination: Bytes,
    pub timeout: Option<Duration>,
}

impl ParseCommand for BRPopLPush {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 3, "BRPOPLPUSH")?;
        Ok(BRPopLPush {
            source: extract_bytes(&args[0])?,
            destination: extract_bytes(&args[1])?,
            timeout: extract_timeout(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for BRPopLPush {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = ctx.state.clone();
        state
            .blocker_manager
            .orchestrate_blocking_rpoplpush(ctx, &self.source, &self.destination, self.timeout)
            .await
    }
}

impl CommandSpec for BRPopLPush {
    fn name(&self) -> &'static str {
        "brpoplpush"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::NO_PROPAGATE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.source.clone(), self.destination.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            self.source.clone(),
            self.destination.clone(),
            self.timeout
                .map_or(0, |d| d.as_secs())
                .to_string()
                .into(),
        ]
    }
}
