// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use bytes::Bytes;
use std::sync::Arc;
use zircondb::config::Config;
use zircondb::core::commands::command_trait::CommandExt;
use zircondb::core::state::ServerState;
use zircondb::core::storage::db::{Db, ExecutionContext};
use zircondb::core::{Command, RespValue, ZirconError};
use zircondb::core::protocol::RespFrame;

/// TestContext provides a complete test environment with a real database instance
#[derive(Clone)]
pub struct TestContext {
    pub state: Arc<ServerState>,
    pub db: Arc<Db>,
}

impl TestContext {
    /// Creates a new test context with default configuration
    pub async fn new() -> Self {
        let mut config = Config::default();
        config.databases = 1;
        Self::with_config(config).await
    }

    /// Creates a new test context with custom configuration
    pub async fn with_config(config: Config) -> Self {
        let state = ServerState::initialize(config).expect("Failed to initialize server state");
        let db = state.get_db(0).expect("Failed to get database 0");
        Self { state, db }
    }

    /// Executes a command and returns the response value
    pub async fn execute(&self, command: Command) -> Result<RespValue, ZirconError> {
        self.execute_as(1, command).await
    }

    /// Executes a command under an explicit session id (blocking tests need
    /// distinguishable sessions).
    pub async fn execute_as(
        &self,
        session_id: u64,
        command: Command,
    ) -> Result<RespValue, ZirconError> {
        let locks = self.db.determine_locks_for_command(&command).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks,
            db: &self.db,
            command: Some(command.clone()),
            session_id,
            in_transaction: false,
        };
        let (resp, _outcome) = command.execute(&mut ctx).await?;
        Ok(resp)
    }

    /// Executes a command as if it ran inside an open `MULTI` block.
    pub async fn execute_in_transaction(
        &self,
        command: Command,
    ) -> Result<RespValue, ZirconError> {
        let locks = self.db.determine_locks_for_command(&command).await;
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            locks,
            db: &self.db,
            command: Some(command.clone()),
            session_id: 1,
            in_transaction: true,
        };
        let (resp, _outcome) = command.execute(&mut ctx).await?;
        Ok(resp)
    }

    /// Parses a command from string parts the way the wire would deliver it.
    pub fn try_command(parts: &[&str]) -> Result<Command, ZirconError> {
        let frames = parts
            .iter()
            .map(|p| RespFrame::BulkString(Bytes::from(p.to_string())))
            .collect();
        Command::try_from(RespFrame::Array(frames))
    }

    /// Builds a command from string parts, panicking on malformed input.
    pub fn command(parts: &[&str]) -> Command {
        Self::try_command(parts).expect("failed to parse test command")
    }

    /// Parses and executes a command given as string parts.
    pub async fn run(&self, parts: &[&str]) -> Result<RespValue, ZirconError> {
        self.execute(Self::try_command(parts)?).await
    }

    /// Like `run`, for an explicit session.
    pub async fn run_as(
        &self,
        session_id: u64,
        parts: &[&str],
    ) -> Result<RespValue, ZirconError> {
        self.execute_as(session_id, Self::try_command(parts)?).await
    }
}

/// Unwraps a bulk-string reply.
pub fn bulk(resp: &RespValue) -> Bytes {
    match resp {
        RespValue::BulkString(b) => b.clone(),
        other => panic!("expected bulk string, got {other:?}"),
    }
}

/// Unwraps an array reply into its bulk-string elements.
pub fn bulk_array(resp: &RespValue) -> Vec<Bytes> {
    match resp {
        RespValue::Array(items) => items.iter().map(bulk).collect(),
        other => panic!("expected array, got {other:?}"),
    }
}
