// src/core/commands/set/spop.rs

use crate::core::Command;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::commands::set::srem::Srem;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::value::Literal;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct SPop {
    pub key: Bytes,
}

impl ParseCommand for SPop {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 1, "SPOP")?;
        Ok(SPop {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for SPop {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let outcome;
        let popped;
        {
            let (shard, guard) = ctx.guard_for_key(&self.key)?;
            let Some(entry) = guard.get_mut(&self.key) else {
                return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
            };
            let DataValue::Set(set) = &mut entry.data else {
                return Err(ZirconError::WrongType);
            };

            let mut rng = rand::thread_rng();
            let Some(member) = set.random_member(&mut rng) else {
                return Ok((RespValue::Null, WriteOutcome::DidNotWrite));
            };
            set.remove(&Literal::from(member.clone()));
            let is_now_empty = set.is_empty();
            shard.update_memory(entry.refresh_size());

            outcome = if is_now_empty {
                guard.pop(&self.key);
                WriteOutcome::Delete { keys_deleted: 1 }
            } else {
                WriteOutcome::Write { keys_modified: 1 }
            };
            popped = member.decoded();
        }

        // Rewrite the command in place so propagation records a deterministic
        // `SREM key element` instead of the nondeterministic pop.
        ctx.command = Some(Command::Srem(Srem {
            key: self.key.clone(),
            member: popped.clone(),
        }));

        Ok((RespValue::BulkString(popped), outcome))
    }
}

impl CommandSpec for SPop {
    fn name(&self) -> &'static str {
        "spop"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
