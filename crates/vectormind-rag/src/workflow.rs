//! Retrieval-generation workflow
//!
//! Answering a question runs two stages in a fixed order:
//!
//! ```text
//! question --retrieve--> Retrieved --generate--> Answered
//! ```
//!
//! Each stage consumes the previous stage's record, so a caller cannot
//! generate without having retrieved first. Either stage failing aborts the
//! whole run; no partial answer is returned.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use vectormind_core::{EmbeddingProvider, Error, LLMProvider, Result, VectorIndex};

use crate::config::RagConfig;

/// Separator placed between retrieved chunks in the prompt
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Output of the retrieve stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieved {
    pub question: String,
    /// Chunk texts, most similar first
    pub context: Vec<String>,
}

/// Output of the generate stage; terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answered {
    pub question: String,
    pub context: Vec<String>,
    pub answer: String,
}

/// Assemble the generation prompt from the retrieved context and the question.
///
/// An empty context still yields a complete prompt with an empty context block.
pub fn build_prompt(context: &[String], question: &str) -> String {
    let context_block = context.join(CONTEXT_SEPARATOR);

    format!(
        "You are an assistant specialized in technical and legal document analysis.\n\
         Answer only based on the context below.\n\
         \n\
         CONTEXT:\n\
         {context_block}\n\
         \n\
         QUESTION:\n\
         {question}\n"
    )
}

/// Answers questions from the indexed collection
pub struct RagWorkflow<E, V, L>
where
    E: EmbeddingProvider + ?Sized,
    V: VectorIndex + ?Sized,
    L: LLMProvider + ?Sized,
{
    embedder: Arc<E>,
    index: Arc<V>,
    llm: Arc<L>,
    collection: String,
    model: String,
    top_k: usize,
}

impl<E, V, L> RagWorkflow<E, V, L>
where
    E: EmbeddingProvider + ?Sized,
    V: VectorIndex + ?Sized,
    L: LLMProvider + ?Sized,
{
    /// Create a new workflow over the configured collection and model
    pub fn new(embedder: Arc<E>, index: Arc<V>, llm: Arc<L>, config: &RagConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            embedder,
            index,
            llm,
            collection: config.collection_name.clone(),
            model: config.llm_model.clone(),
            top_k: config.top_k,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run both stages for one question
    pub async fn run(&self, question: &str) -> Result<Answered> {
        let retrieved = self.retrieve(question).await?;
        self.generate(retrieved).await
    }

    /// Embed the question and fetch the most similar chunks
    pub async fn retrieve(&self, question: &str) -> Result<Retrieved> {
        if question.trim().is_empty() {
            warn!("rejecting empty question");
            return Err(Error::InvalidInput("question must not be empty".to_string()));
        }

        let vector = self.embedder.embed(question).await?;
        let points = self.index.query(&self.collection, &vector, self.top_k).await?;

        debug!(
            collection = %self.collection,
            top_k = self.top_k,
            hits = points.len(),
            "retrieved context"
        );

        Ok(Retrieved {
            question: question.to_string(),
            context: points.into_iter().map(|p| p.text).collect(),
        })
    }

    /// Prompt the model with the retrieved context
    pub async fn generate(&self, retrieved: Retrieved) -> Result<Answered> {
        if retrieved.context.is_empty() {
            debug!("no context retrieved, generating with an empty context block");
        }

        let prompt = build_prompt(&retrieved.context, &retrieved.question);
        let answer = self.llm.complete(&prompt, &self.model).await?;

        info!(
            model = %self.model,
            context_chunks = retrieved.context.len(),
            "question answered"
        );

        Ok(Answered {
            question: retrieved.question,
            context: retrieved.context,
            answer,
        })
    }
}
