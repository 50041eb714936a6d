//! Document ingestion pipeline

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::iter;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vectormind_core::{EmbeddingProvider, Error, IndexedPoint, Result, VectorIndex};

use crate::chunking::chunk_text;
use crate::config::RagConfig;
use crate::document::DocumentSource;

/// Outcome of ingesting one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionReport {
    pub document: String,
    pub collection: String,
    pub embed_model: String,
    pub chunks: usize,
    pub dimensions: usize,
    pub point_ids: Vec<String>,
    pub indexed_at: String,
}

/// Turns documents into searchable points: extract, chunk, embed, upsert.
///
/// The pipeline holds no state between calls, so one instance can serve
/// concurrent ingestions. Points for a document are written in a single batch
/// once every chunk has been embedded; any failure before that leaves the
/// index without points for the document.
pub struct IngestionPipeline<E: EmbeddingProvider + ?Sized, V: VectorIndex + ?Sized> {
    embedder: Arc<E>,
    index: Arc<V>,
    collection: String,
    chunk_size: usize,
    embed_concurrency: usize,
}

impl<E, V> IngestionPipeline<E, V>
where
    E: EmbeddingProvider + ?Sized,
    V: VectorIndex + ?Sized,
{
    /// Create a new ingestion pipeline
    pub fn new(embedder: Arc<E>, index: Arc<V>, config: &RagConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            embedder,
            index,
            collection: config.collection_name.clone(),
            chunk_size: config.chunk_size,
            embed_concurrency: config.embed_concurrency,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Extract the document's text and index it
    pub async fn ingest(&self, source: &DocumentSource) -> Result<IngestionReport> {
        let text = source.extract_text()?;
        self.ingest_text(source.name(), &text).await
    }

    /// Index already extracted text under the given document name
    pub async fn ingest_text(&self, document: &str, text: &str) -> Result<IngestionReport> {
        if text.trim().is_empty() {
            warn!(document, "rejecting document without text");
            return Err(Error::EmptyDocument(format!(
                "{} contains no extractable text",
                document
            )));
        }

        let chunks = chunk_text(text, self.chunk_size);
        let Some((first, rest)) = chunks.split_first() else {
            return Err(Error::EmptyDocument(format!("{} produced no chunks", document)));
        };

        // The first vector fixes the collection's dimensionality and is reused below
        let first_vector = self.embedder.embed(first).await?;
        let dimensions = first_vector.len();
        self.index.ensure_collection(&self.collection, dimensions).await?;

        // Collected before streaming so the ingest future stays `Send`; each
        // one is idle until `buffered` polls it
        let pending: Vec<_> = rest.iter().map(|chunk| self.embedder.embed(chunk)).collect();
        let rest_vectors: Vec<Vec<f32>> = stream::iter(pending)
            .buffered(self.embed_concurrency)
            .try_collect()
            .await?;

        let points = chunks
            .iter()
            .zip(iter::once(first_vector).chain(rest_vectors))
            .map(|(chunk, vector)| {
                if vector.len() != dimensions {
                    return Err(Error::DimensionMismatch {
                        expected: dimensions,
                        actual: vector.len(),
                    });
                }
                Ok(IndexedPoint {
                    id: Uuid::new_v4().to_string(),
                    vector,
                    text: chunk.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let point_ids: Vec<String> = points.iter().map(|p| p.id.clone()).collect();
        debug!(document, chunks = points.len(), dimensions, "embedded all chunks");

        self.index.upsert(&self.collection, points).await?;

        let embed_model = self.embedder.model_id().to_string();
        info!(
            document,
            collection = %self.collection,
            embed_model = %embed_model,
            chunks = point_ids.len(),
            "document indexed"
        );

        Ok(IngestionReport {
            document: document.to_string(),
            collection: self.collection.clone(),
            embed_model,
            chunks: point_ids.len(),
            dimensions,
            point_ids,
            indexed_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingIndex, FlakyEmbedder, LetterEmbedder, RaggedEmbedder};
    use insta::assert_yaml_snapshot;

    fn config(chunk_size: usize) -> RagConfig {
        RagConfig {
            chunk_size,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fixed_stride_document() {
        let embedder = Arc::new(LetterEmbedder::default());
        let index = Arc::new(CountingIndex::default());
        let pipeline = IngestionPipeline::new(embedder.clone(), index.clone(), &config(5)).unwrap();

        let report = pipeline.ingest_text("letters.txt", "AAAAABBBBBCCCCC").await.unwrap();

        assert_eq!(report.chunks, 3);
        assert_eq!(report.dimensions, LetterEmbedder::DIMENSIONS);
        assert_eq!(index.inner().dimensions("documents").await, Some(LetterEmbedder::DIMENSIONS));
        assert_eq!(index.inner().count("documents").await.unwrap(), 3);

        // One embedding per chunk: the first vector is cached, not fetched twice
        assert_eq!(embedder.calls(), 3);
        assert_eq!(index.ensure_calls(), 1);
        assert_eq!(index.upsert_calls(), 1);

        assert_yaml_snapshot!(report, {
            ".point_ids" => "[ids]",
            ".indexed_at" => "[timestamp]",
        }, @r###"
        document: letters.txt
        collection: documents
        embed_model: letters
        chunks: 3
        dimensions: 26
        point_ids: "[ids]"
        indexed_at: "[timestamp]"
        "###);
    }

    #[tokio::test]
    async fn test_point_ids_are_unique() {
        let pipeline = IngestionPipeline::new(
            Arc::new(LetterEmbedder::default()),
            Arc::new(CountingIndex::default()),
            &config(2),
        )
        .unwrap();

        let report = pipeline.ingest_text("doc", "abcdefghij").await.unwrap();
        let mut ids = report.point_ids.clone();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected_before_any_call() {
        let embedder = Arc::new(LetterEmbedder::default());
        let index = Arc::new(CountingIndex::default());
        let pipeline = IngestionPipeline::new(embedder.clone(), index.clone(), &config(5)).unwrap();

        for text in ["", "  \n\n \t"] {
            let err = pipeline.ingest_text("empty.pdf", text).await.unwrap_err();
            assert!(matches!(err, Error::EmptyDocument(_)));
        }

        assert_eq!(embedder.calls(), 0);
        assert_eq!(index.ensure_calls(), 0);
        assert_eq!(index.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_mid_batch_writes_nothing() {
        let index = Arc::new(CountingIndex::default());
        let pipeline =
            IngestionPipeline::new(Arc::new(FlakyEmbedder::new(2)), index.clone(), &config(5)).unwrap();

        let err = pipeline
            .ingest_text("doc", "AAAAABBBBBCCCCCDDDDD")
            .await
            .unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(index.upsert_calls(), 0);
        assert_eq!(index.inner().count("documents").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_first_embedding_failure_creates_nothing() {
        let index = Arc::new(CountingIndex::default());
        let pipeline =
            IngestionPipeline::new(Arc::new(FlakyEmbedder::new(0)), index.clone(), &config(5)).unwrap();

        assert!(pipeline.ingest_text("doc", "AAAAA").await.unwrap_err().is_upstream());
        assert_eq!(index.ensure_calls(), 0);
        assert_eq!(index.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_inconsistent_dimensions_are_rejected() {
        let index = Arc::new(CountingIndex::default());
        let pipeline =
            IngestionPipeline::new(Arc::new(RaggedEmbedder), index.clone(), &config(5)).unwrap();

        let err = pipeline.ingest_text("doc", "AAAAABBBBBCC").await.unwrap_err();

        assert!(matches!(err, Error::DimensionMismatch { expected: 5, actual: 2 }));
        assert_eq!(index.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_chunk_order_survives_concurrent_embedding() {
        let index = Arc::new(CountingIndex::default());
        let config = RagConfig {
            chunk_size: 1,
            embed_concurrency: 8,
            ..Default::default()
        };
        let pipeline =
            IngestionPipeline::new(Arc::new(LetterEmbedder::default()), index.clone(), &config).unwrap();

        pipeline.ingest_text("alphabet", "abcdefghijklmnopqrstuvwxyz").await.unwrap();

        // Every chunk is one letter; its own histogram must be its best match
        for letter in ["a", "m", "z"] {
            let query = LetterEmbedder::histogram(letter);
            let results = index.inner().query("documents", &query, 1).await.unwrap();
            assert_eq!(results[0].text, letter);
        }
    }

    #[tokio::test]
    async fn test_unparseable_document_is_extraction_error() {
        let index = Arc::new(CountingIndex::default());
        let pipeline =
            IngestionPipeline::new(Arc::new(LetterEmbedder::default()), index.clone(), &config(5)).unwrap();

        let source = DocumentSource::from_upload("broken.pdf", b"%PDF-garbage".to_vec()).unwrap();
        let err = pipeline.ingest(&source).await.unwrap_err();

        assert!(matches!(err, Error::Extraction(_)));
        assert_eq!(index.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_ingestion_runs_on_a_spawned_task() {
        let index = Arc::new(CountingIndex::default());
        let pipeline = Arc::new(
            IngestionPipeline::new(Arc::new(LetterEmbedder::default()), index.clone(), &config(5))
                .unwrap(),
        );

        let task = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.ingest_text("spawned", "AAAAABBBBBCCCCC").await })
        };
        let report = task.await.unwrap().unwrap();

        assert_eq!(report.chunks, 3);
        assert_eq!(report.embed_model, "letters");
        assert_eq!(index.upsert_calls(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = IngestionPipeline::new(
            Arc::new(LetterEmbedder::default()),
            Arc::new(CountingIndex::default()),
            &config(0),
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
