//! Error types for pressdigest.

use thiserror::Error;

/// Common error type for pressdigest.
#[derive(Error, Debug)]
pub enum DigestError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Feed fetch or parse error for a single source.
    #[error("feed error: {0}")]
    Feed(String),

    /// Business-day resolution error.
    #[error("calendar error: {0}")]
    Calendar(String),

    /// Wiki publishing error.
    #[error("publish error: {0}")]
    Publish(String),

    /// No usable credential for a user.
    #[error("credential error: {0}")]
    Credential(String),

    /// Task settings could not be read or written.
    #[error("task settings error: {0}")]
    Settings(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pressdigest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
