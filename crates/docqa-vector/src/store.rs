use async_trait::async_trait;
use docqa_core::types::{ChunkPayload, SearchHit};

use crate::error::Result;

/// One stored point: id, vector and the payload returned with search hits.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

/// A nearest-neighbor service holding named, dimension-typed collections
/// compared by cosine similarity.
#[async_trait]
pub trait NearestNeighbor: Send + Sync {
    /// Declared vector dimension of `collection`, or `None` if it does not exist.
    ///
    /// A collection that exists but has no single unnamed vector reports `Some(0)`,
    /// so it never matches an embedder and is treated as a dimension mismatch.
    async fn collection_dim(&self, collection: &str) -> Result<Option<usize>>;

    /// Create `collection` empty with dimension `dim`, replacing any existing one.
    async fn create_collection(&self, collection: &str, dim: usize) -> Result<()>;

    async fn upsert(&self, collection: &str, records: Vec<VectorRecord>) -> Result<()>;

    /// Up to `limit` records ordered by descending cosine similarity.
    async fn search(&self, collection: &str, vector: Vec<f32>, limit: usize) -> Result<Vec<SearchHit>>;

    /// Payloads of up to `limit` records in the service's native scan order.
    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<ChunkPayload>>;
}
