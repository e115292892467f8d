// src/core/commands/list/mod.rs

//! The list command family: pushes, pops, positional reads and writes,
//! removal scans, the atomic pop-and-push, and the blocking variants.

pub mod blpop;
pub mod brpop;
pub mod brpoplpush;
pub mod lindex;
pub mod linsert;
pub mod llen;
pub(crate) mod logic;
pub mod lpop;
pub mod lpush;
pub mod lrange;
pub mod lrem;
pub mod lset;
pub mod ltrim;
pub mod pushx;
pub mod rpop;
pub mod rpoplpush;
pub mod rpush;

pub use blpop::BLPop;
pub use brpop::BRPop;
pub use brpoplpush::BRPopLPush;
pub use lindex::LIndex;
pub use linsert::{InsertPosition, LInsert};
pub use llen::LLen;
pub use lpop::LPop;
pub use lpush::LPush;
pub use lrange::LRange;
pub use lrem::LRem;
pub use lset::LSet;
pub use ltrim::LTrim;
pub use pushx::{LPushX, RPushX};
pub use rpop::RPop;
pub use rpoplpush::RPopLPush;
pub use rpush::RPush;
