//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout chitter.
//! Errors are structured so that handlers can react to the *kind* of failure
//! (duplicate membership vs. generic query failure) without inspecting
//! error message text.
//!
//! # Error Categories
//! - `ConnectionFailed`: could not establish the database connection (fatal)
//! - `QueryFailed`: a statement failed during a menu action (recoverable)
//! - `Duplicate`: a unique-constraint violation (SQLSTATE 23505)
//! - `InvalidInput`: malformed console input
//! - `ConfigError`: connection profile file problems
//! - `Prompt`: the interactive terminal went away mid-prompt

use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Main error type for chitter operations
#[derive(Error, Debug)]
pub enum ChitterError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Unique-constraint violation (e.g. adding the same login to a list twice)
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid console input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (profile file not found, invalid JSON, etc.)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Interactive prompt failed (stdin closed, not a TTY)
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl ChitterError {
    /// Classify a driver error, distinguishing unique-constraint violations
    /// from everything else.
    ///
    /// The original tooling this replaces matched on the literal error text
    /// ("duplicate key violates"); here the classification is structural, via
    /// the SQLSTATE reported by the server.
    pub fn from_db(err: &tokio_postgres::Error) -> Self {
        if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            Self::Duplicate(err.to_string())
        } else {
            Self::QueryFailed(err.to_string())
        }
    }

    /// True if this error is a unique-constraint violation
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

impl From<dialoguer::Error> for ChitterError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

impl From<std::io::Error> for ChitterError {
    fn from(err: std::io::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

/// Result type alias for chitter operations
pub type Result<T> = std::result::Result<T, ChitterError>;
