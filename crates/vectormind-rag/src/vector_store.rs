//! Vector index implementations

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use vectormind_core::{
    Error, IndexedPoint, Result, ScoredPoint, ServiceStatus, TEXT_PAYLOAD_KEY, VectorIndex,
};

struct Collection {
    dimensions: usize,
    // Insertion order doubles as the tie-break order for equal scores
    points: Vec<IndexedPoint>,
    // Point id -> index into `points`
    positions: HashMap<String, usize>,
}

/// Local in-memory vector index implementation
pub struct InMemoryIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryIndex {
    /// Create a new, empty in-memory index
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Dimensionality a collection was created with
    pub async fn dimensions(&self, name: &str) -> Option<usize> {
        self.collections.read().await.get(name).map(|c| c.dimensions)
    }

    /// Simple cosine similarity calculation
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_insert_with(|| {
            debug!(collection = name, dimensions, "created in-memory collection");
            Collection {
                dimensions,
                points: Vec::new(),
                positions: HashMap::new(),
            }
        });
        Ok(())
    }

    async fn upsert(&self, name: &str, points: Vec<IndexedPoint>) -> Result<()> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| Error::InvalidInput(format!("collection '{}' does not exist", name)))?;

        if let Some(point) = points.iter().find(|p| p.vector.len() != collection.dimensions) {
            return Err(Error::DimensionMismatch {
                expected: collection.dimensions,
                actual: point.vector.len(),
            });
        }

        let count = points.len();
        for point in points {
            match collection.positions.get(&point.id) {
                Some(&position) => collection.points[position] = point,
                None => {
                    collection.positions.insert(point.id.clone(), collection.points.len());
                    collection.points.push(point);
                }
            }
        }

        debug!(collection = name, count, "upserted points to in-memory index");
        Ok(())
    }

    async fn query(&self, name: &str, vector: &[f32], k: usize) -> Result<Vec<ScoredPoint>> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(name) else {
            return Ok(Vec::new());
        };

        if vector.len() != collection.dimensions {
            return Err(Error::DimensionMismatch {
                expected: collection.dimensions,
                actual: vector.len(),
            });
        }

        let mut results: Vec<ScoredPoint> = collection
            .points
            .iter()
            .map(|point| ScoredPoint {
                id: point.id.clone(),
                text: point.text.clone(),
                score: Self::cosine_similarity(vector, &point.vector),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);

        Ok(results)
    }

    async fn count(&self, name: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        Ok(collections.get(name).map_or(0, |c| c.points.len()))
    }
}

/// Qdrant vector index implementation
pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    /// Create a new Qdrant index connecting to the given gRPC URL
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Check whether the Qdrant server answers its health endpoint
    pub async fn health_check(&self) -> ServiceStatus {
        match self.client.health_check().await {
            Ok(_) => ServiceStatus::Online,
            Err(e) => {
                debug!(error = %e, "qdrant health check failed");
                ServiceStatus::Offline
            }
        }
    }

    fn map_err(e: QdrantError) -> Error {
        Error::upstream("qdrant", e)
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        Ok(collections.collections.iter().any(|c| c.name == name))
    }

    /// Extract a string from a Qdrant payload value
    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.collection_exists(name).await? {
            debug!(collection = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        let created = self
            .client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await;

        if let Err(e) = created {
            // A concurrent ingestion may have created it between the check and the create
            if self.collection_exists(name).await? {
                debug!(collection = name, "qdrant collection created concurrently");
                return Ok(());
            }
            return Err(Self::map_err(e));
        }

        debug!(collection = name, dimensions, "created qdrant collection");
        Ok(())
    }

    async fn upsert(&self, name: &str, points: Vec<IndexedPoint>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        let points = points
            .into_iter()
            .map(|point| {
                let mut payload_map = serde_json::Map::new();
                payload_map.insert(TEXT_PAYLOAD_KEY.to_string(), serde_json::Value::String(point.text));
                let payload =
                    Payload::try_from(serde_json::Value::Object(payload_map)).map_err(Self::map_err)?;
                Ok(PointStruct::new(point.id, point.vector, payload))
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(name, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection = name, count, "upserted points to qdrant");
        Ok(())
    }

    async fn query(&self, name: &str, vector: &[f32], k: usize) -> Result<Vec<ScoredPoint>> {
        // Qdrant reports a missing collection as an error; callers expect an empty result
        if !self.collection_exists(name).await? {
            debug!(collection = name, "qdrant collection missing, returning no results");
            return Ok(Vec::new());
        }

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(name, vector.to_vec(), k as u64).with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let results = response
            .result
            .into_iter()
            .map(|scored| {
                let id = scored
                    .id
                    .as_ref()
                    .and_then(|pid| match &pid.point_id_options {
                        Some(PointIdOptions::Uuid(s)) => Some(s.clone()),
                        Some(PointIdOptions::Num(n)) => Some(n.to_string()),
                        None => None,
                    })
                    .unwrap_or_default();

                let text = scored
                    .payload
                    .get(TEXT_PAYLOAD_KEY)
                    .and_then(Self::extract_string)
                    .unwrap_or_default();

                ScoredPoint {
                    id,
                    text,
                    score: scored.score,
                }
            })
            .collect();

        Ok(results)
    }

    async fn count(&self, name: &str) -> Result<usize> {
        if !self.collection_exists(name).await? {
            return Ok(0);
        }

        let response = self
            .client
            .count(CountPointsBuilder::new(name).exact(true))
            .await
            .map_err(Self::map_err)?;

        Ok(response.result.map_or(0, |r| r.count as usize))
    }
}
