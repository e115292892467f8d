// src/core/commands/set/smove.rs

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
pub struct Smove {
    pub source: Bytes,
    pub destination: Bytes,
    pub member: Bytes,
}

impl ParseCommand for Smove {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 3, "SMOVE")?;
        Ok(Smove {
            source: extract_bytes(&args[0])?,
            destination: extract_bytes(&args[1])?,
            member: extract_bytes(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Smove {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = ctx.state.clone();
        let max_intset = state.set_max_intset_entries().await;
        let val = Value::try_encode(self.member.clone());

        // If the source key does not exist return 0. A wrong-typed source or
        // destination fails before anything is mutated.
        {
            let (_, guard) = ctx.guard_for_key(&self.source)?;
            match guard.peek(&self.source) {
                None => return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite)),
                Some(entry) => {
                    if !matches!(entry.data, DataValue::Set(_)) {
                        return Err(ZirconError::WrongType);
                    }
                }
            }
        }
        {
            let (_, guard) = ctx.guard_for_key(&self.destination)?;
            if let Some(entry) = guard.peek(&self.destination)
                && !matches!(entry.data, DataValue::Set(_))
            {
                return Err(ZirconError::WrongType);
            }
        }

        // Moving within one key is a membership test.
        if self.source == self.destination {
            let (_, guard) = ctx.guard_for_key(&self.source)?;
            let Some(entry) = guard.peek(&self.source) else {
                return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
            };
            let DataValue::Set(set) = &entry.data else {
                return Err(ZirconError::WrongType);
            };
            let present = set.contains(&Literal::from(val));
            return Ok((
                RespValue::Integer(present as i64),
                WriteOutcome::DidNotWrite,
            ));
        }

        // Remove from the source; an absent element means no move.
        let source_deleted = {
            let (shard, guard) = ctx.guard_for_key(&self.source)?;
            let Some(entry) = guard.get_mut(&self.source) else {
                return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
            };
            let DataValue::Set(set) = &mut entry.data else {
                return Err(ZirconError::WrongType);
            };
            if !set.remove(&Literal::from(val.clone())) {
                return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
            }
            let is_now_empty = set.is_empty();
            shard.update_memory(entry.refresh_size());
            if is_now_empty {
                guard.pop(&self.source);
            }
            is_now_empty
        };

        // Create the destination set when it doesn't exist, then add.
        {
            let (shard, guard) = ctx.guard_for_key(&self.destination)?;
            let entry = guard.get_or_insert_with_mut(self.destination.clone(), || {
                StoredValue::new(DataValue::Set(SetObject::create_for(&val)))
            });
            let DataValue::Set(set) = &mut entry.data else {
                return Err(ZirconError::WrongType);
            };
            set.add(&Literal::from(val), max_intset);
            shard.update_memory(entry.refresh_size());
        }

        let source_outcome = if source_deleted {
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::Write { keys_modified: 1 }
        };
        Ok((
            RespValue::Integer(1),
            source_outcome.merge(WriteOutcome::Write { keys_modified: 1 }),
        ))
    }
}

impl CommandSpec for Smove {
    fn name(&self) -> &'static str {
        "smove"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.source.clone(), self.destination.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![
            self.source.clone(),
            self.destination.clone(),
            self.member.clone(),
        ]
    }
}
