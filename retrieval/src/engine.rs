//! The retrieval pipeline orchestrator.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use quill_documents::{Document, DocumentStore};
use quill_embeddings::{EmbeddingCache, RemoteProvider, rank_top_k};
use quill_generation::{GenerationClient, GenerationRequest, SamplingParams};

use crate::config::{EmbeddingProviderKind, RetrievalConfig};
use crate::error::{Result, RetrievalError};
use crate::prompt::{self, Exemplar, PromptOptions};

/// Characters of the input text used as the retrieval query when
/// transforming long texts.
const TRANSFORM_QUERY_LIMIT: usize = 3000;

/// Engine composing corpus, cache, ranking, prompt assembly, and the
/// generation client into one pipeline.
///
/// Each call reloads the corpus, resolves embeddings (the only step that
/// touches network or disk), ranks, and assembles, completing fully or
/// failing as a unit.
pub struct StyleEngine {
    /// Configuration.
    config: RetrievalConfig,

    /// Example-document corpus.
    store: DocumentStore,

    /// Persistent embedding cache with provider fallback.
    cache: EmbeddingCache,

    /// Generation client, present when a token is configured.
    client: Option<GenerationClient>,
}

impl StyleEngine {
    /// Initialize the engine from a configuration.
    pub async fn new(config: RetrievalConfig) -> Result<Self> {
        info!("initializing style engine");

        let store = DocumentStore::new(&config.documents_dir).await?;

        let mut cache =
            EmbeddingCache::open(&config.cache_path, config.embedding.dimension).await;
        if config.embedding.provider == EmbeddingProviderKind::Remote {
            match &config.embedding.api_key {
                Some(api_key) => {
                    let mut provider = RemoteProvider::new(api_key.as_str())
                        .with_dimension(config.embedding.dimension)
                        .with_timeout(Duration::from_secs(config.embedding.timeout_secs));
                    if let Some(endpoint) = &config.embedding.endpoint {
                        provider = provider.with_base_url(endpoint.as_str());
                    }
                    if let Some(model) = &config.embedding.model {
                        provider = provider.with_model(model.as_str());
                    }
                    cache = cache.with_provider(Box::new(provider));
                }
                None => {
                    warn!("remote embedding provider selected but no API key; using local provider");
                }
            }
        }

        let client = config.generation.token.as_ref().map(|token| {
            let mut client = GenerationClient::new(token.as_str())
                .with_timeout(Duration::from_secs(config.generation.timeout_secs));
            if let Some(endpoint) = &config.generation.endpoint {
                client = client.with_endpoint(endpoint.as_str());
            }
            if let Some(model) = &config.generation.model {
                client = client.with_model(model.as_str());
            }
            client
        });

        Ok(Self {
            config,
            store,
            cache,
            client,
        })
    }

    /// The underlying document store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Retrieve the exemplars closest to `query` and assemble the
    /// generation request for a new document.
    ///
    /// Fails with [`RetrievalError::EmptyCorpus`] before any embedding or
    /// cache I/O when there are no documents.
    pub async fn retrieve_and_build_request(
        &mut self,
        query: &str,
        options: &PromptOptions,
    ) -> Result<GenerationRequest> {
        let documents = self.store.load_all().await?;
        if documents.is_empty() {
            return Err(RetrievalError::EmptyCorpus);
        }

        let exemplars = self.retrieve(query, &documents).await?;
        Ok(prompt::assemble(query, &exemplars, options))
    }

    /// Generate a new document on `topic` in the user's style.
    pub async fn generate(
        &mut self,
        topic: &str,
        options: &PromptOptions,
        params: SamplingParams,
    ) -> Result<String> {
        let request = self
            .retrieve_and_build_request(topic, options)
            .await?
            .with_params(params);

        let client = self.configured_client()?;
        Ok(client.complete(&request).await?)
    }

    /// Rewrite `original_text` in the user's style.
    ///
    /// Retrieval is keyed on an excerpt of the input so very long texts
    /// don't drown the similarity query.
    pub async fn transform(
        &mut self,
        original_text: &str,
        options: &PromptOptions,
        params: SamplingParams,
    ) -> Result<String> {
        let documents = self.store.load_all().await?;
        if documents.is_empty() {
            return Err(RetrievalError::EmptyCorpus);
        }

        let excerpt: String = original_text.chars().take(TRANSFORM_QUERY_LIMIT).collect();
        let exemplars = self.retrieve(&excerpt, &documents).await?;
        let request =
            prompt::assemble_transform(original_text, &exemplars, options).with_params(params);

        let client = self.configured_client()?;
        Ok(client.complete(&request).await?)
    }

    /// Resolve embeddings for the corpus and the query, rank, and return
    /// the top exemplars with their canonical texts.
    async fn retrieve(&mut self, query: &str, documents: &[Document]) -> Result<Vec<Exemplar>> {
        let mut candidates = Vec::with_capacity(documents.len());
        let mut texts: HashMap<String, String> = HashMap::with_capacity(documents.len());

        for document in documents {
            let text = document.canonical_text();
            let vector = self.cache.resolve(&document.id, &text).await;
            candidates.push((document.id.clone(), vector));
            texts.insert(document.id.clone(), text);
        }

        let query_vector = self.cache.embed(query).await;
        let ranked = rank_top_k(&query_vector, &candidates, self.config.embedding.top_k)?;
        debug!("ranked {} candidates, kept {}", candidates.len(), ranked.len());

        Ok(ranked
            .into_iter()
            .map(|result| Exemplar {
                text: texts.remove(&result.id).unwrap_or_default(),
                score: result.score,
            })
            .collect())
    }

    fn configured_client(&self) -> Result<&GenerationClient> {
        self.client
            .as_ref()
            .ok_or_else(|| RetrievalError::Config("generation token not configured".to_string()))
    }
}
