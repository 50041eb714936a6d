//! LLM provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text generation services
///
/// A single blocking completion: the prompt goes out fully assembled and the
/// generated text comes back materialized. The text may be empty.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Complete `prompt` with the model identified by `model`
    async fn complete(&self, prompt: &str, model: &str) -> Result<String>;
}
