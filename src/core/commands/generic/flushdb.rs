// src/core/commands/generic/flushdb.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::validate_arg_count;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, ExecutionLocks};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct FlushDb;

impl ParseCommand for FlushDb {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 0, "FLUSHDB")?;
        Ok(FlushDb)
    }
}

#[async_trait]
impl ExecutableCommand for FlushDb {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let ExecutionLocks::All { guards } = &mut ctx.locks else {
            return Err(ZirconError::LockingError(
                "FLUSHDB requires all shard locks".into(),
            ));
        };
        for guard in guards.iter_mut() {
            guard.clear();
        }
        Ok((RespValue::ok(), WriteOutcome::Flush))
    }
}

impl CommandSpec for FlushDb {
    fn name(&self) -> &'static str {
        "flushdb"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::ADMIN
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![]
    }
}
