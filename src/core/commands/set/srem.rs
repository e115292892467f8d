// src/core/commands/set/srem.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::value::{Literal, Value};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Srem {
    pub key: Bytes,
    pub member: Bytes,
}

impl ParseCommand for Srem {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "SREM")?;
        Ok(Srem {
            key: extract_bytes(&args[0])?,
            member: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Srem {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let val = Value::try_encode(self.member.clone());

        let (shard, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        };
        let DataValue::Set(set) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };

        if !set.remove(&Literal::from(val)) {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        }
        let is_now_empty = set.is_empty();
        shard.update_memory(entry.refresh_size());

        let outcome = if is_now_empty {
            guard.pop(&self.key);
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::Write { keys_modified: 1 }
        };
        Ok((RespValue::Integer(1), outcome))
    }
}

impl CommandSpec for Srem {
    fn name(&self) -> &'static str {
        "srem"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), self.member.clone()]
    }
}
