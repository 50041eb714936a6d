//! Ollama client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use vectormind_core::{EmbeddingProvider, Error, LLMProvider, Result, ServiceStatus};

use crate::config::OllamaConfig;

const SERVICE: &str = "ollama";
const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Ollama client
///
/// One HTTP client serves both the embedding and the generation endpoints.
/// Every call is a single request: no retries, no streaming.
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create a new Ollama client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OllamaConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Check whether the Ollama server answers at all
    pub async fn status(&self) -> ServiceStatus {
        let result = self
            .client
            .get(&self.config.base_url)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(_) => ServiceStatus::Online,
            Err(e) => {
                debug!(error = %e, base_url = %self.config.base_url, "ollama status probe failed");
                ServiceStatus::Offline
            }
        }
    }

    /// POST a JSON body and decode the JSON answer
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::upstream(
                SERVICE,
                format!("{} returned status {}: {}", path, status, error_text),
            ));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.embed_model,
            prompt: text,
        };

        let response: EmbeddingResponse = self.post_json("/api/embeddings", &request).await?;

        // Ollama answers with an empty vector for models that cannot embed
        if response.embedding.is_empty() {
            return Err(Error::upstream(
                SERVICE,
                format!("model '{}' returned an empty embedding", self.config.embed_model),
            ));
        }

        debug!(
            model = %self.config.embed_model,
            chars = text.chars().count(),
            dimensions = response.embedding.len(),
            "embedded text"
        );
        Ok(response.embedding)
    }

    fn model_id(&self) -> &str {
        &self.config.embed_model
    }
}

#[async_trait]
impl LLMProvider for OllamaClient {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response: GenerateResponse = self.post_json("/api/generate", &request).await?;

        debug!(model, chars = response.response.chars().count(), "generated completion");
        Ok(response.response)
    }
}
