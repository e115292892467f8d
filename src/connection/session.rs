// src/connection/session.rs

//! Per-connection session state.

/// Mutable state scoped to one client connection.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Index of the database this session operates on.
    pub db_index: usize,
    /// True while a `MULTI` block is open.
    pub in_transaction: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Default::default()
    }
}
