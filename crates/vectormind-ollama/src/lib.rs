//! Ollama integration for VectorMind
//!
//! This crate provides the Ollama implementation of the EmbeddingProvider and
//! LLMProvider traits.

mod client;
mod config;


pub use client::OllamaClient;
pub use config::OllamaConfig;

// Re-export core types for convenience
pub use vectormind_core::{EmbeddingProvider, Error, LLMProvider, Result, ServiceStatus};
