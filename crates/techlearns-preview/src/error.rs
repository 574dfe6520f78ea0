//! Error types for the preview server.

use std::path::PathBuf;

/// Preview server error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// IO error.
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Address could not be parsed or bound.
    #[error("invalid address: {0}")]
    Address(String),

    /// Watch error.
    #[error("file watch error: {0}")]
    Watch(String),
}

impl From<std::io::Error> for PreviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: e.to_string(),
        }
    }
}

/// Result type for preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;
