//! # Embeddings
//!
//! This crate provides embedding generation, caching, and similarity
//! ranking for the Quill style-retrieval pipeline.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors, either via a
//!   remote embeddings API or a deterministic offline fallback
//! - **Persistent Caching**: Vectors are cached per document id and survive
//!   across runs as a single binary blob
//! - **Similarity Ranking**: Cosine-similarity top-K over a small corpus
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Embeddings System                      │
//! ├────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► EmbeddingCache ──► rank_top_k       │
//! │       │                      │                             │
//! │       ▼                      ▼                             │
//! │  Remote/Hash           cache blob on disk                  │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod hash;
pub mod provider;
pub mod similarity;

pub use cache::EmbeddingCache;
pub use error::{EmbeddingError, Result};
pub use hash::fnv1a_64;
pub use provider::{EmbeddingProvider, HashProvider, RemoteProvider};
pub use similarity::{RankedResult, cosine_similarity, rank_top_k};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Default embedding dimension, fixed for the lifetime of a cache file.
pub const DEFAULT_DIMENSION: usize = 1536;

/// Default number of ranked results returned by the similarity ranker.
pub const DEFAULT_TOP_K: usize = 3;

/// Guard against division by zero when unit-normalizing.
pub(crate) const NORM_EPSILON: f32 = 1e-8;
