//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for embedding services (e.g., Ollama, OpenAI, etc.)
///
/// Converts one text into one fixed-length vector. The length is decided by
/// the backing model and must stay the same for every call against it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single non-empty text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding model ID being used
    fn model_id(&self) -> &str;
}
