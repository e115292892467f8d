// src/core/commands/list/rpoplpush.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::commands::list::logic::rpoplpush_logic;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct RPopLPush {
    pub source: Bytes,
    pub destination: Bytes,
}

impl ParseCommand for RPopLPush {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "RPOPLPUSH")?;
        Ok(RPopLPush {
            source: extract_bytes(&args[0])?,
            destination: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for RPopLPush {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        rpoplpush_logic(ctx, &self.source, &self.destination).await
    }
}

impl CommandSpec for RPopLPush {
    fn name(&self) -> &'static str {
        "rpoplpush"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.source.clone(), self.destination.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.source.clone(), self.destination.clone()]
    }
}
