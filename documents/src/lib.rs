//! # Documents
//!
//! This crate owns the corpus of example documents that Quill retrieves
//! against: the `Document` type with its canonical text rendering, the
//! JSON-per-file `DocumentStore`, and a tolerant parser that imports
//! loosely structured plain text into the fixed field set.

pub mod document;
pub mod error;
pub mod parser;
pub mod store;

pub use document::Document;
pub use error::{DocumentError, Result};
pub use parser::parse_document;
pub use store::DocumentStore;
