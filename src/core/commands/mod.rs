// src/core/commands/mod.rs

//! This module defines all supported commands, organizes them into categories,
//! and provides the central `Command` enum that encapsulates their parsed state.
//! The `define_commands!` macro generates the enum and its core
//! implementations, reducing boilerplate and ensuring consistency.

use crate::core::commands::command_trait::{
    CommandExt, CommandFlags, ExecutableCommand, ParseCommand, WriteOutcome,
};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{RespValue, ZirconError};
use async_trait::async_trait;
use bytes::Bytes;

// Re-export the CommandSpec trait for easy access by other modules.
pub use command_spec::CommandSpec;

pub mod command_spec;
pub mod command_trait;
pub mod generic;
pub mod helpers;
pub mod list;
pub mod set;

macro_rules! define_commands {
    ( $( ($variant:ident, $name:literal, $path:ty) ),+ $(,)? ) => {
        /// The central enum encapsulating every parsed command.
        #[derive(Debug, Clone)]
        pub enum Command {
            $( $variant($path), )+
        }

        impl Command {
            /// The lowercase wire name of the command.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Command::$variant(cmd) => cmd.name(), )+
                }
            }

            /// Re-serializes the command into the RESP array frame a
            /// propagation consumer would put on the wire.
            pub fn to_frame(&self) -> RespFrame {
                let args = match self {
                    $( Command::$variant(cmd) => cmd.to_resp_args(), )+
                };
                let mut frames = Vec::with_capacity(args.len() + 1);
                frames.push(RespFrame::BulkString(Bytes::from(
                    self.name().to_ascii_uppercase(),
                )));
                frames.extend(args.into_iter().map(RespFrame::BulkString));
                RespFrame::Array(frames)
            }
        }

        #[async_trait]
        impl CommandExt for Command {
            fn get_flags(&self) -> CommandFlags {
                match self {
                    $( Command::$variant(cmd) => cmd.flags(), )+
                }
            }

            fn get_keys(&self) -> Vec<Bytes> {
                match self {
                    $( Command::$variant(cmd) => cmd.get_keys(), )+
                }
            }

            async fn execute<'a>(
                &self,
                ctx: &mut ExecutionContext<'a>,
            ) -> Result<(RespValue, WriteOutcome), ZirconError> {
                match self {
                    $( Command::$variant(cmd) => cmd.execute(ctx).await, )+
                }
            }
        }

        impl TryFrom<RespFrame> for Command {
            type Error = ZirconError;

            fn try_from(frame: RespFrame) -> Result<Self, Self::Error> {
                let RespFrame::Array(frames) = frame else {
                    return Err(ZirconError::ProtocolError(
                        "expected an array of bulk strings".to_string(),
                    ));
                };
                let (name_frame, args) = frames.split_first().ok_or_else(|| {
                    ZirconError::ProtocolError("empty command frame".to_string())
                })?;
                let name = helpers::extract_string(name_frame)?.to_ascii_lowercase();
                match name.as_str() {
                    $( $name => Ok(Command::$variant(<$path as ParseCommand>::parse(args)?)), )+
                    other => Err(ZirconError::UnknownCommand(other.to_string())),
                }
            }
        }
    };
}

define_commands! {
    // --- Generic Commands ---
    (Ping, "ping", generic::Ping),
    (Echo, "echo", generic::Echo),
    (Del, "del", generic::Del),
    (Exists, "exists", generic::Exists),
    (Type, "type", generic::TypeInfo),
    (Object, "object", generic::Object),
    (DbSize, "dbsize", generic::DbSize),
    (FlushDb, "flushdb", generic::FlushDb),
    (Config, "config", generic::ConfigGetSet),
    (Info, "info", generic::Info),
    (Multi, "multi", generic::Multi),
    (Exec, "exec", generic::Exec),
    (Discard, "discard", generic::Discard),

    // --- List Commands ---
    (LPush, "lpush", list::LPush),
    (LPushX, "lpushx", list::LPushX),
    (RPush, "rpush", list::RPush),
    (RPushX, "rpushx", list::RPushX),
    (LPop, "lpop", list::LPop),
    (RPop, "rpop", list::RPop),
    (LLen, "llen", list::LLen),
    (LRange, "lrange", list::LRange),
    (LIndex, "lindex", list::LIndex),
    (LTrim, "ltrim", list::LTrim),
    (LInsert, "linsert", list::LInsert),
    (LSet, "lset", list::LSet),
    (LRem, "lrem", list::LRem),
    (RPopLPush, "rpoplpush", list::RPopLPush),
    (BLPop, "blpop", list::BLPop),
    (BRPop, "brpop", list::BRPop),
    (BRPopLPush, "brpoplpush", list::BRPopLPush),

    // --- Set Commands ---
    (Sadd, "sadd", set::Sadd),
    (Srem, "srem", set::Srem),
    (Smove, "smove", set::Smove),
    (Sismember, "sismember", set::Sismember),
    (Scard, "scard", set::Scard),
    (SPop, "spop", set::SPop),
    (SrandMember, "srandmember", set::SrandMember),
    (Smembers, "smembers", set::Smembers),
    (SInter, "sinter", set::SInter),
    (SInterStore, "sinterstore", set::SInterStore),
    (SUnion, "sunion", set::SUnion),
    (SUnionStore, "sunionstore", set::SUnionStore),
    (Sdiff, "sdiff", set::Sdiff),
    (SdiffStore, "sdiffstore", set::SdiffStore),
}
