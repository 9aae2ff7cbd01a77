//! Centralized error types for TraceLens.

use thiserror::Error;

/// Main error type for TraceLens operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("Analysis task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for TraceLens operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a malformed model output error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedModelOutput(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
