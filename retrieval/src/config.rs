//! Configuration for the retrieval pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use quill_embeddings::{DEFAULT_DIMENSION, DEFAULT_TOP_K};

/// Configuration for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory holding the example-document corpus.
    pub documents_dir: PathBuf,

    /// Path of the embedding cache blob.
    pub cache_path: PathBuf,

    /// Embedding configuration.
    pub embedding: EmbeddingSettings,

    /// Generation configuration.
    pub generation: GenerationSettings,
}

impl RetrievalConfig {
    /// Create a configuration rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base = base_dir.into();
        Self {
            documents_dir: base.join("documents"),
            cache_path: base.join("embeddings_cache.bin"),
            embedding: EmbeddingSettings::default(),
            generation: GenerationSettings::default(),
        }
    }

    /// Set the documents directory.
    pub fn with_documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    /// Set the cache path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Set the number of exemplars retrieved per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.embedding.top_k = top_k;
        self
    }

    /// Set the embedding provider kind.
    pub fn with_provider(mut self, provider: EmbeddingProviderKind) -> Self {
        self.embedding.provider = provider;
        self
    }

    /// Set the generation token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.generation.token = Some(token.into());
        self
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::new(dirs::data_dir().unwrap_or_default().join("quill"))
    }
}

/// Which embedding provider computes vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// Remote embeddings API, with local fallback on failure.
    Remote,
    /// Deterministic offline provider only.
    Local,
}

/// Configuration for embedding resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Which provider to use.
    pub provider: EmbeddingProviderKind,

    /// Vector dimension, fixed for the lifetime of a cache file.
    pub dimension: usize,

    /// Number of exemplars retrieved per query.
    pub top_k: usize,

    /// API key for the remote provider.
    pub api_key: Option<String>,

    /// Base URL of the remote provider, if not the default.
    pub endpoint: Option<String>,

    /// Model name of the remote provider, if not the default.
    pub model: Option<String>,

    /// Remote request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Local,
            dimension: DEFAULT_DIMENSION,
            top_k: DEFAULT_TOP_K,
            api_key: None,
            endpoint: None,
            model: None,
            timeout_secs: 30,
        }
    }
}

/// Configuration for the generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Bearer token. Without one the engine can still build requests, but
    /// not send them.
    pub token: Option<String>,

    /// Base URL of the generation endpoint, if not the default.
    pub endpoint: Option<String>,

    /// Model identifier, if not the default.
    pub model: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: None,
            model: None,
            timeout_secs: 120,
        }
    }
}
