//! Embedding providers.
//!
//! Two providers are supported: a remote provider that calls an embeddings
//! API over HTTP, and a deterministic local provider that works offline.
//! The local provider doubles as the fallback whenever the remote call
//! fails, so a retrieval operation never dies on provider unavailability.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{EmbeddingError, Result};
use crate::hash::fnv1a_64;
use crate::{DEFAULT_DIMENSION, Embedding, NORM_EPSILON};

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Name of this provider, used in logs.
    fn name(&self) -> &str;

    /// Dimension of the vectors this provider produces.
    fn dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Embedding>;
}

/// Remote embedding provider.
///
/// Posts to an OpenAI-compatible `/embeddings` endpoint under an explicit
/// timeout. Every failure mode (timeout, transport, non-success status,
/// malformed body) surfaces as a recoverable error so the caller can fall
/// back to [`HashProvider`].
pub struct RemoteProvider {
    /// API key sent as a bearer token.
    api_key: String,

    /// API base URL.
    base_url: String,

    /// Embedding model name.
    model: String,

    /// Expected output dimension.
    dimension: usize,

    /// Per-request timeout.
    timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl RemoteProvider {
    /// Create a new remote provider with default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: DEFAULT_DIMENSION,
            timeout: Duration::from_secs(30),
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the expected output dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        debug!("requesting embedding from {} model {}", self.base_url, self.model);

        let body = serde_json::json!({
            "input": text,
            "model": self.model,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::ProviderUnavailable(format!(
                        "timeout after {:?}",
                        self.timeout
                    ))
                } else {
                    EmbeddingError::ProviderUnavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let excerpt: String = response.text().await.unwrap_or_default().chars().take(200).collect();
            return Err(EmbeddingError::ProviderUnavailable(format!(
                "status {status}: {excerpt}"
            )));
        }

        let result: EmbeddingApiResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| {
                EmbeddingError::InvalidResponse("no embedding in response".to_string())
            })?
            .embedding;

        debug!("received embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}

/// Wire format of the embeddings endpoint response.
#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingApiData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiData {
    embedding: Vec<f32>,
}

/// Deterministic, offline embedding provider.
///
/// Tokenizes the text into lowercase word tokens, folds each token's FNV-1a
/// hash into a fixed-dimension vector, and unit-normalizes the result. Two
/// calls with identical text produce bit-identical vectors, so tests can
/// assert exact equality.
pub struct HashProvider {
    dimension: usize,
}

impl HashProvider {
    /// Create a provider producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashProvider {
    fn name(&self) -> &str {
        "local-hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(hash_embedding(text, self.dimension))
    }
}

/// Compute the deterministic fallback embedding for `text`.
///
/// Only the first `dimension` tokens contribute; each adds
/// `fnv1a64(token) % 1000 / 1000.0` at position `i % dimension`. Empty text
/// yields the zero vector; everything else is normalized to unit length
/// with an epsilon guard against division by zero.
pub fn hash_embedding(text: &str, dimension: usize) -> Embedding {
    let mut vector = vec![0.0f32; dimension];
    let lowered = text.to_lowercase();

    for (i, token) in word_tokens(&lowered).take(dimension).enumerate() {
        let component = (fnv1a_64(token.as_bytes()) % 1000) as f32 / 1000.0;
        vector[i % dimension] += component;
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    for x in &mut vector {
        *x /= norm + NORM_EPSILON;
    }

    vector
}

/// Lowercase word tokens, split on word boundaries.
fn word_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_word_tokens() {
        let tokens: Vec<&str> = word_tokens("hello, world! foo_bar 42").collect();
        assert_eq!(tokens, vec!["hello", "world", "foo_bar", "42"]);
    }

    #[tokio::test]
    async fn test_hash_provider_deterministic() {
        let provider = HashProvider::new(64);
        let a = provider.embed("machine learning essay").await.unwrap();
        let b = provider.embed("machine learning essay").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hash_provider_unit_norm() {
        let provider = HashProvider::new(64);
        let vector = provider.embed("the quick brown fox").await.unwrap();
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6, "norm was {norm}");
    }

    #[tokio::test]
    async fn test_hash_provider_empty_text_is_zero_vector() {
        let provider = HashProvider::new(16);
        let vector = provider.embed("").await.unwrap();
        assert_eq!(vector, vec![0.0f32; 16]);
    }

    #[tokio::test]
    async fn test_hash_provider_case_insensitive() {
        let provider = HashProvider::new(32);
        let a = provider.embed("Design Patterns").await.unwrap();
        let b = provider.embed("design patterns").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hash_provider_distinct_texts_differ() {
        let provider = HashProvider::new(32);
        let a = provider.embed("databases and indexing").await.unwrap();
        let b = provider.embed("watercolor landscape painting").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_remote_provider_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"embedding": [0.6, 0.8, 0.0]}]
            })))
            .mount(&server)
            .await;

        let provider = RemoteProvider::new("test-key")
            .with_base_url(server.uri())
            .with_dimension(3);
        let vector = provider.embed("hello").await.unwrap();
        assert_eq!(vector, vec![0.6, 0.8, 0.0]);
    }

    #[tokio::test]
    async fn test_remote_provider_error_status_is_recoverable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = RemoteProvider::new("test-key").with_base_url(server.uri());
        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_remote_provider_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = RemoteProvider::new("test-key").with_base_url(server.uri());
        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_remote_provider_empty_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let provider = RemoteProvider::new("test-key").with_base_url(server.uri());
        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }
}
