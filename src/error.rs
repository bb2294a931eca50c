//! Error types for Feedmill.

use thiserror::Error;

/// Common error type for Feedmill.
#[derive(Error, Debug)]
pub enum FeedmillError {
    /// Database error.
    ///
    /// Wraps errors from the sqlx layer; conversions are automatic.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed fetch or parse error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FeedmillError {
    fn from(e: sqlx::Error) -> Self {
        FeedmillError::Database(e.to_string())
    }
}

/// Result type alias for Feedmill operations.
pub type Result<T> = std::result::Result<T, FeedmillError>;
