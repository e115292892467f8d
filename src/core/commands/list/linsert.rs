// src/core/commands/list/linsert.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::list_object::ListObject;
use crate::core::storage::value::Value;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InsertPosition {
    #[default]
    Before,
    After,
}

#[derive(Debug, Clone, Default)]
pub struct LInsert {
    pub key: Bytes,
    pub position: InsertPosition,
    pub pivot: Bytes,
    pub element: Bytes,
}

impl ParseCommand for LInsert {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 4, "LINSERT")?;
        let key = extract_bytes(&args[0])?;
        let pos_str = extract_string(&args[1])?.to_ascii_lowercase();
        let position = match pos_str.as_str() {
            "before" => InsertPosition::Before,
            "after" => InsertPosition::After,
            _ => return Err(ZirconError::SyntaxError),
        };
        Ok(LInsert {
            key,
            position,
            pivot: extract_bytes(&args[2])?,
            element: extract_bytes(&args[3])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LInsert {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = ctx.state.clone();
        let limits = state.list_limits().await;
        let val = Value::try_encode(self.element.clone());

        let (shard, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok((RespValue::Integer(0), WriteOutcome::DidNotWrite));
        };
        let DataValue::List(lobj) = &mut entry.data else {
            return Err(ZirconError::WrongType);
        };

        // The scan and the insert cannot straddle an encoding change, so when
        // the element's shape alone would force a promotion, promote before
        // scanning rather than looping over the list twice.
        lobj.try_convert_for(&val, &limits);

        let mut inserted = false;
        let mut grew_past_bound = false;
        match lobj {
            ListObject::Packed(pl) => {
                let mut cursor = pl.head();
                while let Some(off) = cursor {
                    if pl.compare(off, &self.pivot) {
                        match self.position {
                            InsertPosition::Before => pl.insert(off, &val),
                            InsertPosition::After => match pl.next(off) {
                                Some(next) => pl.insert(next, &val),
                                None => pl.push_tail(&val),
                            },
                        }
                        grew_past_bound = pl.len() as usize > limits.max_entries;
                        inserted = true;
                        break;
                    }
                    cursor = pl.next(off);
                }
            }
            ListObject::Linked(dll) => {
                let pivot_val = Value::try_encode(self.pivot.clone());
                if let Some(pos) = dll.iter().position(|v| *v == pivot_val) {
                    let at = match self.position {
                        InsertPosition::Before => pos,
                        InsertPosition::After => pos + 1,
                    };
                    dll.insert(at, val);
                    inserted = true;
                }
            }
        }

        if !inserted {
            return Ok((RespValue::Integer(-1), WriteOutcome::DidNotWrite));
        }
        if grew_past_bound {
            lobj.convert_to_linked();
        }
        let final_len = lobj.len() as i64;
        shard.update_memory(entry.refresh_size());
        Ok((
            RespValue::Integer(final_len),
            WriteOutcome::Write { keys_modified: 1 },
        ))
    }
}

impl CommandSpec for LInsert {
    fn name(&self) -> &'static str {
        "linsert"
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
            (match self.position {
                InsertPosition::Before => "BEFORE",
                InsertPosition::After => "AFTER",
            })
            .into(),
            self.pivot.clone(),
            self.element.clone(),
        ]
    }
}
