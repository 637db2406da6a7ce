//! Error types for the retrieval pipeline.

use thiserror::Error;

use quill_documents::DocumentError;
use quill_embeddings::EmbeddingError;
use quill_generation::GenerationError;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval pipeline.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The corpus has no documents. This is the single documented
    /// precondition failure of the pipeline: recoverable by adding example
    /// documents and retrying.
    #[error("no example documents available; add example documents before generating")]
    EmptyCorpus,

    /// Document store error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(EmbeddingError),

    /// Generation error, surfaced verbatim with its classification.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Manual conversion so the ranker's empty-candidates failure surfaces as
// the pipeline-level EmptyCorpus instead of a generic embedding error.
impl From<EmbeddingError> for RetrievalError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::EmptyCorpus => RetrievalError::EmptyCorpus,
            other => RetrievalError::Embedding(other),
        }
    }
}
