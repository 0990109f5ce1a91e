//! Error types for the local visualizer.
//!
//! Errors carry a stable numeric code and a category so callers can group
//! them without matching every variant:
//! - 10-19: Configuration errors
//! - 20-29: Session state errors
//! - 30-39: Document and figure errors
//! - 40-49: Server errors
//! - 50-59: I/O errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for local visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Invalid configuration values.
    Config,
    /// Operation not allowed in the current session state.
    Session,
    /// Document writing and figure rendering.
    Document,
    /// Background server startup.
    Server,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Session => write!(f, "session"),
            ErrorCategory::Document => write!(f, "document"),
            ErrorCategory::Server => write!(f, "server"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the local visualizer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(
        "{operation} was called before the session was started; \
         start it with `Session::start`"
    )]
    NotStarted { operation: &'static str },

    #[error("invalid header level {level}: expected 1 to 5")]
    InvalidHeaderLevel { level: u8 },

    #[error("figure rendering failed: {0}")]
    Figure(String),

    #[error("table row has {actual} cells, expected {expected}")]
    TableShape { expected: usize, actual: usize },

    #[error("failed to bind server on {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::NotStarted { .. } => 20,
            Error::InvalidHeaderLevel { .. } => 30,
            Error::Figure(_) => 31,
            Error::TableShape { .. } => 32,
            Error::Bind { .. } => 40,
            Error::Io(_) => 50,
            Error::Json(_) => 51,
        }
    }

    /// Returns the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::NotStarted { .. } => ErrorCategory::Session,
            Error::InvalidHeaderLevel { .. } | Error::Figure(_) | Error::TableShape { .. } => {
                ErrorCategory::Document
            }
            Error::Bind { .. } => ErrorCategory::Server,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether this is an invalid-state error from an unstarted session.
    pub fn is_not_started(&self) -> bool {
        matches!(self, Error::NotStarted { .. })
    }
}
