// src/core/commands/set/sinterstore.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_bytes;
use crate::core::commands::set::set_ops_logic::sinter_generic;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct SInterStore {
    pub destination: Bytes,
    pub keys: Vec<Bytes>,
}

impl ParseCommand for SInterStore {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        if args.len() < 2 {
            return Err(ZirconError::WrongArgumentCount("SINTERSTORE".to_string()));
        }
        Ok(SInterStore {
            destination: extract_bytes(&args[0])?,
            keys: args[1..].iter().map(extract_bytes).collect::<Result<_, _>>()?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for SInterStore {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        sinter_generic(ctx, &self.keys, Some(&self.destination)).await
    }
}

impl CommandSpec for SInterStore {
    fn name(&self) -> &'static str {
        "sinterstore"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        let mut keys = vec![self.destination.clone()];
        keys.extend(self.keys.clone());
        keys
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        self.get_keys()
    }
}
