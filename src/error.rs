//! Error types for FernDB
//!
//! This module defines all error types used throughout the database engine.
//! Recoverable, user-facing problems (semantic errors, constraint violations)
//! are reported as diagnostic lines through [`crate::output::Output`] rather
//! than through this type; `Error` covers command syntax, condition syntax,
//! and persistence failures.

use thiserror::Error;

/// The main error type for FernDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Command Syntax Errors ==========
    #[error("Command not supported: {0}")]
    UnsupportedCommand(String),

    #[error("{0}")]
    Syntax(String),

    // ========== Condition Errors ==========
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    // ========== Persistence Errors ==========
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FernDB operations
pub type Result<T> = std::result::Result<T, Error>;
