// src/core/commands/list/ltrim.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_index, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::list_object::ListObject;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LTrim {
    pub key: Bytes,
    pub start: i64,
    pub end: i64,
}

impl ParseCommand for LTrim {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 3, "LTRIM")?;
        Ok(LTrim {
            key: extract_bytes(&args[0])?,
            start: extract_index(&args[1])?,
            end: extract_index(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LTrim {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (shard, guard) = ctx.guard_for_key(&self.key)?;
        // A missing key is already trimmed.
        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok((RespValue::ok(), WriteOutcome::DidNotWrite));
        };
        let DataValue::List(lobj) = &mut entry.data else {
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

        // Out of range start or start > end result in an empty list.
        let (ltrim, rtrim) = if start > end || start >= llen {
            (llen, 0)
        } else {
            if end >= llen {
                end = llen - 1;
            }
            (start, llen - end - 1)
        };

        // Remove list elements to perform the trim.
        match lobj {
            ListObject::Packed(pl) => {
                pl.delete_range(0, ltrim as u32);
                pl.delete_range(-rtrim, rtrim as u32);
            }
            ListObject::Linked(dll) => {
                for _ in 0..ltrim {
                    dll.pop_front();
                }
                for _ in 0..rtrim {
                    dll.pop_back();
                }
            }
        }
        let is_now_empty = lobj.is_empty();
        shard.update_memory(entry.refresh_size());

        let outcome = if is_now_empty {
            guard.pop(&self.key);
            WriteOutcome::Delete { keys_deleted: 1 }
        } else {
            WriteOutcome::Write { keys_modified: 1 }
        };
        Ok((RespValue::ok(), outcome))
    }
}

impl CommandSpec for LTrim {
    fn name(&self) -> &'static str {
        "ltrim"
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
            self.start.to_string().into(),
            self.end.to_string().into(),
        ]
    }
}
