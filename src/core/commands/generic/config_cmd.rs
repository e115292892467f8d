// src/core/commands/generic/config_cmd.rs

//! `CONFIG GET`/`CONFIG SET` for the runtime-mutable knobs. Lowering an
//! encoding bound never retroactively promotes existing containers; the new
//! value is simply consulted at the next mutation.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{
    CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::commands::helpers::extract_string;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    Get(String),
    Set(String, String),
}

impl Default for ConfigAction {
    fn default() -> Self {
        ConfigAction::Get(String::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigGetSet {
    pub action: ConfigAction,
}

impl ParseCommand for ConfigGetSet {
    fn parse(args: &[RespFrame]) -> Result<Self, ZirconError> {
        if args.is_empty() {
            return Err(ZirconError::WrongArgumentCount("CONFIG".to_string()));
        }
        let sub = extract_string(&args[0])?.to_ascii_lowercase();
        let action = match (sub.as_str(), args.len()) {
            ("get", 2) => ConfigAction::Get(extract_string(&args[1])?.to_ascii_lowercase()),
            ("set", 3) => ConfigAction::Set(
                extract_string(&args[1])?.to_ascii_lowercase(),
                extract_string(&args[2])?,
            ),
            _ => return Err(ZirconError::SyntaxError),
        };
        Ok(ConfigGetSet { action })
    }
}

fn parse_positive(param: &str, value: &str) -> Result<usize, ZirconError> {
    let n: usize = value
        .parse()
        .map_err(|_| ZirconError::InvalidState(format!("Invalid value for '{param}'")))?;
    if n == 0 {
        return Err(ZirconError::InvalidState(format!(
            "Value for '{param}' must be positive"
        )));
    }
    Ok(n)
}

#[async_trait]
impl ExecutableCommand for ConfigGetSet {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<(RespValue, WriteOutcome), ZirconError> {
        let mut config = ctx.state.config.lock().await;
        match &self.action {
            ConfigAction::Get(param) => {
                let value = match param.as_str() {
                    "list_max_ziplist_entries" => Some(config.list_max_ziplist_entries.to_string()),
                    "list_max_ziplist_value" => Some(config.list_max_ziplist_value.to_string()),
                    "set_max_intset_entries" => Some(config.set_max_intset_entries.to_string()),
                    "log_level" => Some(config.log_level.clone()),
                    _ => None,
                };
                let reply = match value {
                    Some(v) => RespValue::Array(vec![
                        RespValue::BulkString(Bytes::from(param.clone())),
                        RespValue::BulkString(Bytes::from(v)),
                    ]),
                    None => RespValue::Array(vec![]),
                };
                Ok((reply, WriteOutcome::DidNotWrite))
            }
            ConfigAction::Set(param, value) => {
                match param.as_str() {
                    "list_max_ziplist_entries" => {
                        config.list_max_ziplist_entries = parse_positive(param, value)?;
                    }
                    "list_max_ziplist_value" => {
                        config.list_max_ziplist_value = parse_positive(param, value)?;
                    }
                    "set_max_intset_entries" => {
                        config.set_max_intset_entries = parse_positive(param, value)?;
                    }
                    "log_level" => {
                        config.log_level = value.clone();
                    }
                    _ => {
                        return Err(ZirconError::InvalidState(format!(
                            "Unknown config parameter '{param}'"
                        )));
                    }
                }
                Ok((RespValue::ok(), WriteOutcome::DidNotWrite))
            }
        }
    }
}

impl CommandSpec for ConfigGetSet {
    fn name(&self) -> &'static str {
        "config"
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::ADMIN | CommandFlags::NO_PROPAGATE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![]
    }
    fn to_resp_args(&self) -> Vec<Bytes> {
        match &self.action {
            ConfigAction::Get(param) => {
                vec![Bytes::from_static(b"GET"), Bytes::from(param.clone())]
            }
            ConfigAction::Set(param, value) => vec![
                Bytes::from_static(b"SET"),
                Bytes::from(param.clone()),
                Bytes::from(value.clone()),
            ],
        }
    }
}
