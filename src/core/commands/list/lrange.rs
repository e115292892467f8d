// src/core/commands/list/lrange.rs

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
pub struct LRange {
    pub key: Bytes,
    pub start: i64,
    pub end: i64,
}

impl ParseCommand for LRange {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 3, "LRANGE")?;
        Ok(LRange {
            key: extract_bytes(&args[0])?,
            start: extract_index(&args[1])?,
            end: extract_index(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.peek(&self.key) else {
            return Ok((RespValue::Array(vec![]), WriteOutcome::DidNotWrite));
        };
        let DataValue::List(lobj) = &entry.data else {
            return Err(ZirconError::WrongType);
        };

        let llen = lobj.len() as i64;
        let mut start = self.start;
        let mut end = self.end;

        // Convert negative indexes.
        if start < 0 {
            start += llen;
        }
        if end < 0 {
            end += llen;
        }
        if start < 0 {
            start = 0;
        }

        // Invariant: start >= 0, so this test will be true when end < 0.
        // The range is empty when start > end or start >= length.
        if start > end || start >= llen {
            return Ok((RespValue::Array(vec![]), WriteOutcome::DidNotWrite));
        }
        if end >= llen {
            end = llen - 1;
        }
        let rangelen = (end - start + 1) as usize;

        let items: Vec<RespValue> = lobj
            .iter()
            .skip(start as usize)
            .take(rangelen)
            .map(|lit| RespValue::BulkString(lit.decoded()))
            .collect();

        Ok((RespValue::Array(items), WriteOutcome::DidNotWrite))
    }
}

impl CommandSpec for LRange {
    fn name(&self) -> &'static str {
        "lrange"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            self.key.clone(),
            self.start.to_string().into(),
            self.end.to_string().into(),
        ]
    }
}
