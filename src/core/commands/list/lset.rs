// src/core/commands/list/lset.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_index, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::value::Value;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LSet {
    pub key: Bytes,
    pub index: i64,
    pub value: Bytes,
}

impl ParseCommand for LSet {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 3, "LSET")?;
        Ok(LSet {
            key: extract_bytes(&args[0])?,
            index: extract_index(&args[1])?,
            value: extract_bytes(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LSet {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = ctx.state.clone();
        let limits = state.list_limits().await;
        let val = Value::try_encode(self.value.clone());

        let (shard, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.get_mut(&self.key) else {
            return Err(ZirconError::KeyNotFound);
        };
        let DataValue::List(lobj) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };
        // A large replacement value may force promotion before the write.
        if !lobj.set(self.index, val, &limits) {
            return Err(ZirconError::IndexOutOfRange);
        }
        shard.update_memory(entry.refresh_size());
        Ok((RespValue::ok(), WriteOutcome::Write { keys_modified: 1 }))
    }
}

impl CommandSpec for LSet {
    fn name(&self) -> &'static str {
        "lset"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            self.key.clone(),
            self.index.to_string().into(),
            self.value.clone(),
        ]
    }
}
