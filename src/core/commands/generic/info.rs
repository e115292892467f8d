// src/core/commands/generic/info.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::validate_arg_count;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct Info;

impl ParseCommand for Info {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        validate_arg_count(args, 0, "INFO")?;
        Ok(Info)
    }
}

#[async_trait]
impl ExecutableCommand for Info {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let state = &ctx.state;
        let mut out = String::new();

        let _ = writeln!(out, "# Server");
        let _ = writeln!(out, "zircondb_version:{}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(out);

        let _ = writeln!(out, "# Clients");
        let _ = writeln!(out, "connected_clients:{}", state.clients.len());
        let _ = writeln!(
            out,
            "blocked_clients:{}",
            state.blocker_manager.blocked_client_count()
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "# Memory");
        let used: usize = state.dbs.iter().map(|db| db.get_current_memory()).sum();
        let _ = writeln!(out, "used_memory:{used}");
        let _ = writeln!(out);

        let _ = writeln!(out, "# Stats");
        let _ = writeln!(
            out,
            "total_connections_received:{}",
            state.stats.total_connections()
        );
        let _ = writeln!(
            out,
            "total_commands_processed:{}",
            state.stats.total_commands()
        );
        let _ = writeln!(out, "dirty:{}", state.dirty());
        let _ = writeln!(out);

        let _ = writeln!(out, "# Keyspace");
        for (i, db) in state.dbs.iter().enumerate() {
            let keys = db.get_key_count();
            if keys > 0 {
                let _ = writeln!(out, "db{i}:keys={keys}");
            }
        }

        Ok((
            RespValue::BulkString(Bytes::from(out)),
            WriteOutcome::DidNotWrite,
        ))
    }
}

impl CommandSpec for Info {
    fn name(&self) -> &'static str {
        "info"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY | CommandFlags::NO_PROPAGATE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        vec![]
    }
}
