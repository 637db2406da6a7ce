//! # Retrieval
//!
//! This crate composes the Quill pipeline: it loads the example-document
//! corpus, resolves embeddings through the persistent cache, ranks the
//! documents against a query, assembles a style-conditioning prompt from
//! the top matches, and hands the finished request to the generation
//! client.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                         StyleEngine                            │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────────┐    │
//! │  │  Document   │──►│  Embedding   │──►│   rank_top_k     │    │
//! │  │   Store     │   │    Cache     │   └────────┬─────────┘    │
//! │  └─────────────┘   └──────────────┘            │              │
//! │                                                ▼              │
//! │                    ┌──────────────┐   ┌──────────────────┐    │
//! │                    │  Generation  │◄──│ Prompt Assembly  │    │
//! │                    │    Client    │   └──────────────────┘    │
//! │                    └──────────────┘                           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod prompt;

pub use config::{EmbeddingProviderKind, RetrievalConfig};
pub use engine::StyleEngine;
pub use error::{Result, RetrievalError};
pub use prompt::{Exemplar, PromptOptions};

// Re-export from dependencies for convenience
pub use quill_documents::{Document, DocumentStore};
pub use quill_generation::{GenerationRequest, SamplingParams};
