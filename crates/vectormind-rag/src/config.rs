//! RAG configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use vectormind_core::{Error, Result};

/// Which vector index backs the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Qdrant over gRPC
    Qdrant,
    /// Process-local index; contents are lost when the process exits
    Memory,
}

impl FromStr for IndexBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "qdrant" => Ok(IndexBackend::Qdrant),
            "memory" => Ok(IndexBackend::Memory),
            other => Err(Error::Configuration(format!(
                "VECTOR_BACKEND must be 'qdrant' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Configuration for ingestion and retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    pub qdrant_url: String,
    pub collection_name: String,
    pub llm_model: String,
    pub chunk_size: usize,
    pub top_k: usize,
    pub embed_concurrency: usize,
    pub backend: IndexBackend,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            qdrant_url: "http://localhost:6334".to_string(),
            collection_name: "documents".to_string(),
            llm_model: "llama3.2".to_string(),
            chunk_size: 500,
            top_k: 5,
            embed_concurrency: 4,
            backend: IndexBackend::Qdrant,
        }
    }
}

impl RagConfig {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            qdrant_url: env::var("QDRANT_URL").unwrap_or(defaults.qdrant_url),
            collection_name: env::var("COLLECTION_NAME").unwrap_or(defaults.collection_name),
            llm_model: env::var("LLM_MODEL").unwrap_or(defaults.llm_model),
            chunk_size: parse_var("CHUNK_SIZE", defaults.chunk_size)?,
            top_k: parse_var("TOP_K", defaults.top_k)?,
            embed_concurrency: parse_var("EMBED_CONCURRENCY", defaults.embed_concurrency)?,
            backend: match env::var("VECTOR_BACKEND") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.backend,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline and workflow cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be greater than zero".to_string()));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration("top_k must be greater than zero".to_string()));
        }
        if self.embed_concurrency == 0 {
            return Err(Error::Configuration(
                "embed_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.collection_name.trim().is_empty() {
            return Err(Error::Configuration("collection_name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_var(name: &str, default: usize) -> Result<usize> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
            Error::Configuration(format!("{} must be a positive integer, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
