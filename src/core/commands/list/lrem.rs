// src/core/commands/list/lrem.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_index, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::list_object::ListObject;
use crate::core::storage::value::Value;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LRem {
    pub key: Bytes,
    pub count: i64,
    pub value: Bytes,
}

impl ParseCommand for LRem {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 3, "LREM")?;
        Ok(LRem {
            key: extract_bytes(&args[0])?,
            count: extract_index(&args[1])?,
            value: extract_bytes(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LRem {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (shard, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        };
        let DataValue::List(lobj) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };

        let reverse = self.count < 0;
        let toremove = self.count.unsigned_abs();
        let mut removed: u64 = 0;

        match lobj {
            ListObject::Packed(pl) => {
                let mut cursor = if reverse { pl.tail() } else { pl.head() };
                while let Some(off) = cursor {
                    if toremove != 0 && removed >= toremove {
                        break;
                    }
                    if pl.compare(off, &self.value) {
                        let next = pl.delete(off);
                        removed += 1;
                        // When traversing tail to head, everything at and past
                        // the deleted offset has been checked already.
                        cursor = if reverse { pl.prev(off) } else { next };
                    } else {
                        cursor = if reverse { pl.prev(off) } else { pl.next(off) };
                    }
                }
            }
            ListObject::Linked(dll) => {
                let target = Value::try_encode(self.value.clone());
                if reverse {
                    let mut i = dll.len();
                    while i > 0 {
                        if toremove != 0 && removed >= toremove {
                            break;
                        }
                        i -= 1;
                        if dll[i] == target {
                            dll.remove(i);
                            removed += 1;
                        }
                    }
                } else {
                    let mut i = 0;
                    while i < dll.len() {
                        if toremove != 0 && removed >= toremove {
                            break;
                        }
                        if dll[i] == target {
                            dll.remove(i);
                            removed += 1;
                        } else {
                            i += 1;
                        }
                    }
                }
            }
        }

        if removed == 0 {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        }
        let is_now_empty = lobj.is_empty();
        shard.update_memory(entry.refresh_size());
        let outcome = if is_now_empty {
            guard.pop(&self.key);
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::Write { keys_modified: 1 }
        };
        Ok((RespValue::Integer(removed as i64), outcome))
    }
}

impl CommandSpec for LRem {
    fn name(&self) -> &'static str {
        "lrem"
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
            self.count.to_string().into(),
            self.value.clone(),
        ]
    }
}
