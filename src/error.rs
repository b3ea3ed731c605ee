//! Error types for promodoro.

use thiserror::Error;

/// Errors produced by the promodoro library.
#[derive(Debug, Error)]
pub enum PromodoroError {
    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be read, written, or resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An ID prefix matched more than one task.
    #[error("Ambiguous task ID '{prefix}' matches {count} tasks; use more characters")]
    Ambiguous {
        /// The prefix that was looked up.
        prefix: String,
        /// Number of matching tasks.
        count: usize,
    },

    /// User input was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<rusqlite::Error> for PromodoroError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}
