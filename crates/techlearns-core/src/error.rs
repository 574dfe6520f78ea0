//! Error types for techlearns-core.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type for techlearns-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in techlearns-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Form input failed local validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Language name or extension is not in the registry.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Stored session could not be read.
    #[error("session error: {0}")]
    Session(String),

    /// Invalid operation (e.g., starting an operation that is already pending).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Format the error with a recovery hint where one exists.
    pub fn with_hint(&self) -> String {
        match self {
            Self::UnsupportedLanguage(_) => format!(
                "{self}\n  hint: run `techlearns languages` to list supported languages"
            ),
            Self::Session(_) => format!(
                "{self}\n  hint: run `techlearns logout` and log in again"
            ),
            _ => self.to_string(),
        }
    }
}
