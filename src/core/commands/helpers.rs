// src/core/commands/helpers.rs

//! Provides helper functions for parsing command arguments from `RespFrame`s.
//! These helpers reduce boilerplate and ensure consistent error handling across commands.

use crate::core::ZirconError;
use crate::core::protocol::RespFrame;
use bytes::Bytes;
use std::time::Duration;

/// Extracts a `String` from a `RespFrame::BulkString`.
/// Returns a `WrongType` error if the frame is not a BulkString or not valid UTF-8.
pub fn extract_string(frame: &RespFrame) -> Result<String, ZirconError> {
    if let RespFrame::BulkString(bs) = frame {
        String::from_utf8(bs.to_vec()).map_err(|_| ZirconError::WrongType)
    } else {
        Err(ZirconError::WrongType)
    }
}

/// Extracts `Bytes` from a `RespFrame::BulkString`.
/// Returns a `WrongType` error if the frame is not a BulkString.
pub fn extract_bytes(frame: &RespFrame) -> Result<Bytes, ZirconError> {
    match frame {
        RespFrame::BulkString(bs) => Ok(bs.clone()),
        _ => Err(ZirconError::WrongType),
    }
}

/// Validates that the number of arguments matches an exact expected count.
pub fn validate_arg_count(
    args: &[RespFrame],
    expected: usize,
    cmd: &str,
) -> Result<(), ZirconError> {
    if args.len() != expected {
        Err(ZirconError::WrongArgumentCount(cmd.to_string()))
    } else {
        Ok(())
    }
}

/// Parses a signed element index argument (`LINDEX`, `LRANGE`, ...).
pub fn extract_index(frame: &RespFrame) -> Result<i64, ZirconError> {
    extract_string(frame)?
        .parse::<i64>()
        .map_err(|_| ZirconError::NotAnInteger)
}

/// Parses the trailing timeout argument of the blocking commands: an integer
/// number of seconds, where zero means "block forever" (`None`).
pub fn extract_timeout(frame: &RespFrame) -> Result<Option<Duration>, ZirconError> {
    let secs = extract_string(frame)
        .map_err(|_| ZirconError::TimeoutNotInteger)?
        .parse::<i64>()
        .map_err(|_| ZirconError::TimeoutNotInteger)?;
    if secs < 0 {
        return Err(ZirconError::TimeoutNegative);
    }
    if secs == 0 {
        Ok(None)
    } else {
        Ok(Some(Duration::from_secs(secs as u64)))
    }
}
