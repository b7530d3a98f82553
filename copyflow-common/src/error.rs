//! Common error types for Copyflow

use thiserror::Error;

/// Common result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the workflow engine
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    Validation(String),

    /// No uploader identity could be resolved for the request
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Concurrent upload lost the version race; the caller should re-read
    /// the latest version and retry the write.
    #[error("Version conflict: {kind} version {version} for page {page_id} already exists")]
    VersionConflict {
        page_id: uuid::Uuid,
        kind: &'static str,
        version: i64,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors the caller can resolve by retrying the same write
    /// after re-reading current state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::VersionConflict { .. })
    }
}
