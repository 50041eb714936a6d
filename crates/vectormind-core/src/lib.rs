//! Core traits and types for VectorMind
//!
//! This crate defines the fundamental traits and types shared by the VectorMind crates.
//! It provides capability-facing interfaces for embedding services, text generation
//! services and vector indexes, so the ingestion pipeline and the question-answering
//! workflow can be driven by real network clients or by in-process stubs.

pub mod embedding;
pub mod error;
pub mod llm;
pub mod types;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use error::{Error, Result};
pub use llm::LLMProvider;
pub use types::*;
pub use vector_index::VectorIndex;
