//! Deterministic stand-ins for the external services

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use vectormind_core::{
    EmbeddingProvider, Error, IndexedPoint, LLMProvider, Result, ScoredPoint, VectorIndex,
};

use crate::vector_store::InMemoryIndex;

/// Embeds text as a 26-dimensional histogram of ASCII letters.
///
/// "BBBBB" and "bbb" land on the same direction, so a question made of one
/// letter is nearest to the chunk made of that letter.
#[derive(Default)]
pub struct LetterEmbedder {
    calls: AtomicUsize,
}

impl LetterEmbedder {
    pub const DIMENSIONS: usize = 26;

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn histogram(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; Self::DIMENSIONS];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            vector[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::histogram(text))
    }

    fn model_id(&self) -> &str {
        "letters"
    }
}

/// Succeeds for the first `healthy_calls` embeddings, then reports the service as down
pub struct FlakyEmbedder {
    healthy_calls: usize,
    calls: AtomicUsize,
}

impl FlakyEmbedder {
    pub fn new(healthy_calls: usize) -> Self {
        Self {
            healthy_calls,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.healthy_calls {
            return Err(Error::upstream("ollama", "connection refused"));
        }
        Ok(LetterEmbedder::histogram(text))
    }

    fn model_id(&self) -> &str {
        "flaky"
    }
}

/// Returns vectors whose length grows with the text, breaking the fixed-dimension contract
pub struct RaggedEmbedder;

#[async_trait]
impl EmbeddingProvider for RaggedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0; text.chars().count()])
    }

    fn model_id(&self) -> &str {
        "ragged"
    }
}

/// Records every prompt and answers with a fixed text
pub struct RecordingLLM {
    answer: String,
    prompts: Mutex<Vec<(String, String)>>,
}

impl RecordingLLM {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// (prompt, model) pairs in call order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for RecordingLLM {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        Ok(self.answer.clone())
    }
}

/// A generation service that is always down
pub struct DownLLM;

#[async_trait]
impl LLMProvider for DownLLM {
    async fn complete(&self, _prompt: &str, _model: &str) -> Result<String> {
        Err(Error::upstream("ollama", "503 Service Unavailable"))
    }
}

/// Wraps an [`InMemoryIndex`] and counts the calls that reach it
#[derive(Default)]
pub struct CountingIndex {
    inner: InMemoryIndex,
    ensure_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl CountingIndex {
    pub fn ensure_calls(&self) -> usize {
        self.ensure_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryIndex {
        &self.inner
    }
}

#[async_trait]
impl VectorIndex for CountingIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.ensure_collection(name, dimensions).await
    }

    async fn upsert(&self, name: &str, points: Vec<IndexedPoint>) -> Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(name, points).await
    }

    async fn query(&self, name: &str, vector: &[f32], k: usize) -> Result<Vec<ScoredPoint>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query(name, vector, k).await
    }

    async fn count(&self, name: &str) -> Result<usize> {
        self.inner.count(name).await
    }
}

/// An index whose server cannot be reached
pub struct DownIndex;

#[async_trait]
impl VectorIndex for DownIndex {
    async fn ensure_collection(&self, _name: &str, _dimensions: usize) -> Result<()> {
        Err(Error::upstream("qdrant", "transport error"))
    }

    async fn upsert(&self, _name: &str, _points: Vec<IndexedPoint>) -> Result<()> {
        Err(Error::upstream("qdrant", "transport error"))
    }

    async fn query(&self, _name: &str, _vector: &[f32], _k: usize) -> Result<Vec<ScoredPoint>> {
        Err(Error::upstream("qdrant", "transport error"))
    }

    async fn count(&self, _name: &str) -> Result<usize> {
        Err(Error::upstream("qdrant", "transport error"))
    }
}
