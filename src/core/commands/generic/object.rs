// src/core/commands/generic/object.rs

//! `OBJECT ENCODING key`: the sanctioned side channel for observing a
//! container's current internal encoding.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Object {
    pub key: Bytes,
}

impl ParseCommand for Object {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 2, "OBJECT")?;
        let subcommand = extract_string(&args[0])?.to_ascii_lowercase();
        if subcommand != "encoding" {
            return Err(ZirconError::SyntaxError);
        }
        Ok(Object {
            key: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Object {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let (_, guard) = ctx.guard_for_key(&self.key)?;
        let Some(entry) = guard.peek(&self.key) else {
            return Err(ZirconError::KeyNotFound);
        };
        Ok((
            RespValue::BulkString(Bytes::from_static(
                entry.data.encoding_name().as_bytes(),
            )),
            WriteOutcome::DidNotWrite,
        ))
    }
}

impl CommandSpec for Object {
    fn name(&self) -> &'static str {
        "object"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![Bytes::from_static(b"ENCODING"), self.key.clone()]
    }
}
