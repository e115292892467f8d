// src/core/commands/set/sismember.rs

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
pub struct Sismember {
    pub key: Bytes,
    pub member: Bytes,
}

impl ParseCommand for Sismember {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "SISMEMBER")?;
        Ok(Sismember {
            key: extract_bytes(&args[0])?,
            member: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Sismember {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.peek(&self.key) else {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        };
        let DataValue::Set(set) = &entry.data else {
            return Err(ZirconError::WrongType);
        };
        let val = Value::try_encode(self.member.clone());
        let present = set.contains(&Literal::from(val));
        Ok((
            RespValue::Integer(present as i64),
            WriteOutcome::DidNotWrite,
        ))
    }
}

impl CommandSpec for Sismember {
    fn name(&self) -> &'static str {
        "sismember"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), self.member.clone()]
    }
}
