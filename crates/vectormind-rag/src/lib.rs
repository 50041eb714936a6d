//! Retrieval-augmented generation for VectorMind
//!
//! This crate provides the vector index gateways, document extraction and chunking,
//! the ingestion pipeline that fills a collection, and the two-stage workflow that
//! answers questions from it.

mod chunking;
mod config;
mod document;
mod ingest;
mod vector_store;
mod workflow;

#[cfg(test)]
mod testing;

pub use chunking::chunk_text;
pub use config::{IndexBackend, RagConfig};
pub use document::DocumentSource;
pub use ingest::{IngestionPipeline, IngestionReport};
pub use vector_store::{InMemoryIndex, QdrantIndex};
pub use workflow::{Answered, RagWorkflow, Retrieved, build_prompt};

// Re-export core types for convenience
pub use vectormind_core::{
    EmbeddingProvider, Error, IndexedPoint, LLMProvider, Result, ScoredPoint, ServiceStatus,
    VectorIndex,
};
