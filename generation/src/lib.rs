//! # Generation
//!
//! This crate is the boundary to the external text-generation service:
//! role-tagged chat messages, sampling parameters, and an HTTP client that
//! returns generated text or a classified failure. Nothing here is
//! retrieval-aware; the prompt arrives fully assembled.

pub mod client;
pub mod error;
pub mod request;

pub use client::GenerationClient;
pub use error::{GenerationError, Result};
pub use request::{ChatMessage, GenerationRequest, MessageRole, SamplingParams};
