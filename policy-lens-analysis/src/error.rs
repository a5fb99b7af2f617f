//! Error types for policy-lens analysis operations.

use std::path::Path;

use thiserror::Error;

/// Result alias used across the crate.
pub type PolicyLensResult<T> = Result<T, PolicyLensError>;

/// Errors that can occur while loading or analyzing policy documents.
#[derive(Debug, Error)]
pub enum PolicyLensError {
    /// A required file or directory does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A document could not be parsed as TOML or JSON.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A document parsed but is semantically inconsistent.
    #[error("invalid document {path}: {message}")]
    Validation { path: String, message: String },

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A report could not be serialized for output.
    #[error("failed to render JSON report: {0}")]
    Render(#[from] serde_json::Error),
}

impl PolicyLensError {
    /// Build a `NotFound` error from any message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build a `Parse` error for the given document path.
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Build a `Validation` error for the given document path.
    pub fn validation(path: &Path, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}
