// src/core/commands/list/lindex.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_index, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LIndex {
    pub key: Bytes,
    pub index: i64,
}

impl ParseCommand for LIndex {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "LINDEX")?;
        Ok(LIndex {
            key: extract_bytes(&args[0])?,
            index: extract_index(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LIndex {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.peek(&self.key) else {
            return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
        };
        let DataValue::List(lobj) = &entry.data else {
            return Err(ZirconError::WrongType);
        };
        let reply = match lobj.get(self.index) {
            Some(value) => RespValue::BulkString(value.decoded()),
            None => RespValue::Null,
        };
        Ok((reply, WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for LIndex {
    fn name(&self) -> &'static str {
        "lindex"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), self.index.to_string().into()]
    }
}
