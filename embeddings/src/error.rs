//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while computing, caching, or ranking embeddings.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// No candidate documents to rank against.
    #[error("no documents available for retrieval")]
    EmptyCorpus,

    /// Remote provider request failed (timeout, transport, non-success
    /// status). Recoverable: callers fall back to the local provider.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered, but the body was not usable.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Dimension mismatch between vectors.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Cache blob could not be encoded or decoded.
    #[error("cache codec error: {0}")]
    CacheCodec(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
