// src/core/commands/list/pushx.rs

//! `LPUSHX` and `RPUSHX`: push only when the key already holds a list.
//!
//! By precondition the list is non-empty, so no client can be blocked on the
//! key; the push-exists variants therefore bypass the blocking registry.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::{ExecutionContext, PushDirection};
use crate::core::storage::value::Value;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

async fn pushx_logic<'a>(
    ctx: &mut ExecutionContext<'a>,
    key: &Bytes,
    value: &Bytes,
    direction: PushDirection,
) -> Result<(RespValue, WriteOutcome), ZirconError> {
    let state = ctx.state.clone();
    let limits = state.list_limits().await;
    let val = Value::try_encode(value.clone());

    let (shard, guard) = ctx.guard_for_key(key)?;
    let Some(entry) = guard.get_mut(key) else {
        return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
    };
    let DataValue::List(lobj) = &mut entry.data else {
        return Err(ZirconError::WrongType);
    };
    lobj.push(val, direction, &limits);
    let final_len = lobj.len() as i64;
    shard.update_memory(entry.refresh_size());

    Ok((
        RespValue::Integer(final_len),
        WriteOutcome::Write { keys_modified: 1 },
    ))
}

#[derive(Debug, Clone, Default)]
pub struct LPushX {
    pub key: Bytes,
    pub value: Bytes,
}

impl ParseCommand for LPushX {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "LPUSHX")?;
        Ok(LPushX {
            key: extract_bytes(&args[0])?,
            value: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LPushX {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        pushx_logic(ctx, &self.key, &self.value, PushDirection::Left).await
    }
}

impl CommandSpec for LPushX {
    fn name(&self) -> &'static str {
        "lpushx"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), self.value.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct RPushX {
    pub key: Bytes,
    pub value: Bytes,
}

impl ParseCommand for RPushX {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "RPUSHX")?;
        Ok(RPushX {
            key: extract_bytes(&args[0])?,
            value: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for RPushX {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        pushx_logic(ctx, &self.key, &self.value, PushDirection::Right).await
    }
}

impl CommandSpec for RPushX {
    fn name(&self) -> &'static str {
        "rpushx"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone(), self.value.clone()]
    }
}
