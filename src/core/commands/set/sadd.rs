// src/core/commands/set/sadd.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::set_object::SetObject;
use crate::core::storage::value::{Literal, Value};
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Sadd {
    pub key: Bytes,
    pub member: Bytes,
}

impl ParseCommand for Sadd {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "SADD")?;
        Ok(Sadd {
            key: extract_bytes(&args[0])?,
            member: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Sadd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = ctx.state.clone();
        let max_intset = state.set_max_intset_entries().await;
        let val = Value::try_encode(self.member.clone());

        let (shard, guard) = ctx.guard_for_key(&self.key)?;
        // The factory picks the encoding that can hold the first member.
        let entry = guard.get_or_insert_with_mut(self.key.clone(), || {
            StoredValue::new(DataValue::Set(SetObject::create_for(&val)))
        });
        let DataValue::Set(set) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };

        let added = set.add(&Literal::from(val), max_intset);
        shard.update_memory(entry.refresh_size());

        if added {
            Ok((RespValue::Integer(1), WriteOutcome::Write { keys_modified: 1 }))
        } else {
            Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite))
        }
    }
}

impl CommandSpec for Sadd {
    fn name(&self) -> &'static str {
        "sadd"
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
