//! Vector index trait

use async_trait::async_trait;

use crate::{IndexedPoint, Result, ScoredPoint};

/// Trait for vector indexes (e.g., Qdrant)
///
/// Collections use cosine similarity. Implementations must tolerate
/// concurrent upserts and queries; the callers add no locking of their own.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection with cosine distance if it does not exist yet.
    ///
    /// Calling this for an existing collection is a no-op, whatever
    /// `dimensions` is passed.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Insert or overwrite a batch of points, keyed by their ids
    async fn upsert(&self, name: &str, points: Vec<IndexedPoint>) -> Result<()>;

    /// Return up to `k` points ordered by descending cosine similarity.
    ///
    /// A collection that does not exist yields an empty result, not an error.
    async fn query(&self, name: &str, vector: &[f32], k: usize) -> Result<Vec<ScoredPoint>>;

    /// Number of points stored in the collection, zero if it does not exist
    async fn count(&self, name: &str) -> Result<usize>;
}
