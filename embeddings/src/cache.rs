//! Persistent embedding cache.
//!
//! Vectors are keyed by document id and survive across process runs as a
//! single binary blob: the whole file is read once at open and rewritten on
//! every insertion. There is no locking; concurrent processes writing the
//! same file lose updates (last writer wins), which is an accepted
//! limitation for a single-user tool.
//!
//! A cache hit returns the stored vector without re-checking the text, so a
//! document whose text changes under a reused id keeps its stale vector
//! until the cache is explicitly cleared.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, HashProvider};
use crate::{DEFAULT_DIMENSION, Embedding};

/// Cache for embeddings, persisted wholesale to a single file.
pub struct EmbeddingCache {
    /// In-memory entries, keyed by document id.
    entries: HashMap<String, Embedding>,

    /// Path of the on-disk blob.
    path: PathBuf,

    /// Vector dimension, fixed for the lifetime of the cache file.
    dimension: usize,

    /// Optional primary provider. `None` means local-only.
    provider: Option<Box<dyn EmbeddingProvider>>,

    /// Deterministic fallback, always available.
    fallback: HashProvider,
}

impl EmbeddingCache {
    /// Open a cache backed by the file at `path`.
    ///
    /// A missing, corrupt, or dimension-mismatched file yields an empty
    /// cache, never an error.
    pub async fn open(path: impl AsRef<Path>, dimension: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = Self::load(&path, dimension).await;

        Self {
            entries,
            path,
            dimension,
            provider: None,
            fallback: HashProvider::new(dimension),
        }
    }

    /// Open a cache with the default dimension.
    pub async fn open_default(path: impl AsRef<Path>) -> Self {
        Self::open(path, DEFAULT_DIMENSION).await
    }

    /// Set the primary embedding provider. Without one, every embedding is
    /// computed by the deterministic local provider.
    pub fn with_provider(mut self, provider: Box<dyn EmbeddingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an id is cached.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Resolve the embedding for a document.
    ///
    /// A hit returns the stored vector unchanged; the `text` argument is not
    /// re-checked for consistency. A miss computes a vector, stores it, and
    /// rewrites the whole cache file. Persistence failure is reported as a
    /// warning and never prevents the computed vector from being returned.
    pub async fn resolve(&mut self, id: &str, text: &str) -> Embedding {
        if let Some(vector) = self.entries.get(id) {
            debug!("embedding cache hit for {id}");
            return vector.clone();
        }

        let vector = self.embed(text).await;
        self.entries.insert(id.to_string(), vector.clone());

        if let Err(err) = self.persist().await {
            warn!(
                "failed to persist embedding cache to {}: {err}",
                self.path.display()
            );
        }

        vector
    }

    /// Compute an embedding without caching it (used for query text).
    ///
    /// Tries the primary provider first; on any failure, or a vector of the
    /// wrong dimension, falls back to the deterministic local provider with
    /// a warning, so embedding a text never fails outright.
    pub async fn embed(&self, text: &str) -> Embedding {
        if let Some(provider) = &self.provider {
            match provider.embed(text).await {
                Ok(vector) if vector.len() == self.dimension => return vector,
                Ok(vector) => {
                    warn!(
                        "provider {} returned {} dimensions, expected {}; using local fallback",
                        provider.name(),
                        vector.len(),
                        self.dimension
                    );
                }
                Err(err) => {
                    warn!(
                        "provider {} failed ({err}); using local fallback",
                        provider.name()
                    );
                }
            }
        }

        match self.fallback.embed(text).await {
            Ok(vector) => vector,
            // The hash provider is infallible; this arm is unreachable.
            Err(_) => vec![0.0; self.dimension],
        }
    }

    /// Drop every entry and rewrite the (now empty) cache file.
    pub async fn clear(&mut self) {
        self.entries.clear();
        if let Err(err) = self.persist().await {
            warn!(
                "failed to persist cleared embedding cache to {}: {err}",
                self.path.display()
            );
        }
        info!("cleared embedding cache");
    }

    /// Load the whole blob, treating anything unreadable as empty.
    async fn load(path: &Path, dimension: usize) -> HashMap<String, Embedding> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("no embedding cache at {} ({err})", path.display());
                return HashMap::new();
            }
        };

        let entries: HashMap<String, Embedding> =
            match bincode::serde::decode_from_slice(&bytes, bincode::config::standard()) {
                Ok((entries, _)) => entries,
                Err(err) => {
                    warn!(
                        "discarding unreadable embedding cache {}: {err}",
                        path.display()
                    );
                    return HashMap::new();
                }
            };

        // A dimension change invalidates the file silently.
        if entries.values().any(|v| v.len() != dimension) {
            warn!(
                "discarding embedding cache {}: stored dimension differs from {dimension}",
                path.display()
            );
            return HashMap::new();
        }

        info!("loaded {} cached embeddings from disk", entries.len());
        entries
    }

    /// Rewrite the whole cache file.
    async fn persist(&self) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(&self.entries, bincode::config::standard())
            .map_err(|e| EmbeddingError::CacheCodec(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, bytes).await?;

        debug!("persisted {} cache entries to disk", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::provider::hash_embedding;

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            8
        }

        async fn embed(&self, _text: &str) -> Result<Embedding> {
            Err(EmbeddingError::ProviderUnavailable("down".to_string()))
        }
    }

    struct WrongDimensionProvider;

    #[async_trait]
    impl EmbeddingProvider for WrongDimensionProvider {
        fn name(&self) -> &str {
            "wrong-dimension"
        }

        fn dimension(&self) -> usize {
            8
        }

        async fn embed(&self, _text: &str) -> Result<Embedding> {
            Ok(vec![1.0; 4])
        }
    }

    #[tokio::test]
    async fn test_resolve_miss_then_hit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let mut cache = EmbeddingCache::open(&path, 8).await;
        let first = cache.resolve("doc-1", "some text").await;
        let second = cache.resolve("doc-1", "some text").await;
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_hit_wins_over_changed_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let mut cache = EmbeddingCache::open(&path, 8).await;
        let original = cache.resolve("doc-1", "original text").await;
        let stale = cache.resolve("doc-1", "completely different text").await;
        assert_eq!(original, stale);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let expected = {
            let mut cache = EmbeddingCache::open(&path, 8).await;
            cache.resolve("doc-1", "persist me").await
        };

        let mut cache = EmbeddingCache::open(&path, 8).await;
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("doc-1"));
        // The stored vector is returned even though the text differs.
        assert_eq!(cache.resolve("doc-1", "other").await, expected);
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_empty_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");
        tokio::fs::write(&path, b"definitely not bincode").await.unwrap();

        let cache = EmbeddingCache::open(&path, 8).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_dimension_change_invalidates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        {
            let mut cache = EmbeddingCache::open(&path, 4).await;
            cache.resolve("doc-1", "written at dimension four").await;
        }

        let cache = EmbeddingCache::open(&path, 8).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_still_returns_vector() {
        let dir = TempDir::new().unwrap();
        // Parent of the cache path is a regular file, so the write must fail.
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, b"").await.unwrap();
        let path = blocker.join("cache.bin");

        let mut cache = EmbeddingCache::open(&path, 8).await;
        let vector = cache.resolve("doc-1", "still computed").await;
        assert_eq!(vector, hash_embedding("still computed", 8));
    }

    #[tokio::test]
    async fn test_failed_provider_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let mut cache = EmbeddingCache::open(&path, 8)
            .await
            .with_provider(Box::new(FailingProvider));
        let vector = cache.resolve("doc-1", "fallback text").await;
        assert_eq!(vector, hash_embedding("fallback text", 8));
    }

    #[tokio::test]
    async fn test_wrong_dimension_provider_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let cache = EmbeddingCache::open(&path, 8)
            .await
            .with_provider(Box::new(WrongDimensionProvider));
        let vector = cache.embed("some query").await;
        assert_eq!(vector, hash_embedding("some query", 8));
    }

    #[tokio::test]
    async fn test_embed_does_not_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let cache = EmbeddingCache::open(&path, 8).await;
        cache.embed("query text").await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");

        let mut cache = EmbeddingCache::open(&path, 8).await;
        cache.resolve("doc-1", "text").await;
        cache.clear().await;
        assert!(cache.is_empty());

        let reopened = EmbeddingCache::open(&path, 8).await;
        assert!(reopened.is_empty());
    }
}
