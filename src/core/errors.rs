// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::num::ParseIntError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug, Clone)]
pub enum ZirconError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("syntax error")]
    SyntaxError,

    #[error("wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("value is not an integer or out of range")]
    NotAnInteger,

    #[error("no such key")]
    KeyNotFound,

    #[error("index out of range")]
    IndexOutOfRange,

    #[error("timeout is not an integer or out of range")]
    TimeoutNotInteger,

    #[error("timeout is negative")]
    TimeoutNegative,

    #[error("EXECABORT Transaction discarded because of previous errors.")]
    ExecAborted,

    #[error("Command not allowed in the current state: {0}")]
    InvalidState(String),

    #[error("Locking Error: {0}")]
    LockingError(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ZirconError {
    /// Renders the error as the RESP error line sent to clients. Variants that
    /// carry their own canonical prefix (`WRONGTYPE`, `EXECABORT`) are sent
    /// verbatim; everything else gets the generic `ERR` class.
    pub fn to_resp_string(&self) -> String {
        match self {
            ZirconError::WrongType | ZirconError::ExecAborted => self.to_string(),
            other => format!("ERR {other}"),
        }
    }
}

impl PartialEq for ZirconError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ZirconError::Io(e1), ZirconError::Io(e2)) => e1.to_string() == e2.to_string(),
            (ZirconError::ProtocolError(s1), ZirconError::ProtocolError(s2)) => s1 == s2,
            (ZirconError::UnknownCommand(s1), ZirconError::UnknownCommand(s2)) => s1 == s2,
            (ZirconError::WrongArgumentCount(s1), ZirconError::WrongArgumentCount(s2)) => s1 == s2,
            (ZirconError::InvalidState(s1), ZirconError::InvalidState(s2)) => s1 == s2,
            (ZirconError::LockingError(s1), ZirconError::LockingError(s2)) => s1 == s2,
            (ZirconError::Internal(s1), ZirconError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for ZirconError {
    fn from(e: std::io::Error) -> Self {
        ZirconError::Io(Arc::new(e))
    }
}

impl From<std::str::Utf8Error> for ZirconError {
    fn from(_: std::str::Utf8Error) -> Self {
        ZirconError::WrongType
    }
}

impl From<std::string::FromUtf8Error> for ZirconError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        ZirconError::WrongType
    }
}

impl From<ParseIntError> for ZirconError {
    fn from(_: ParseIntError) -> Self {
        ZirconError::NotAnInteger
    }
}
