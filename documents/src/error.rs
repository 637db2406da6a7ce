//! Error types for the document corpus.

use thiserror::Error;

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur while loading, saving, or parsing documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Loose-text parsing failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
