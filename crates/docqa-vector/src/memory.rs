//! In-process store with brute-force cosine search.
//!
//! Nothing is persisted. Used by tests and by `index.backend = "memory"`.

use async_trait::async_trait;
use docqa_core::types::{ChunkPayload, SearchHit};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::store::{NearestNeighbor, VectorRecord};

struct Collection {
    dim: usize,
    records: Vec<VectorRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

fn missing(collection: &str) -> IndexError {
    IndexError::Storage(format!("collection {collection} does not exist"))
}

#[async_trait]
impl NearestNeighbor for MemoryStore {
    async fn collection_dim(&self, collection: &str) -> Result<Option<usize>> {
        Ok(self.collections.read().await.get(collection).map(|c| c.dim))
    }

    async fn create_collection(&self, collection: &str, dim: usize) -> Result<()> {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), Collection { dim, records: Vec::new() });
        debug!(collection, dim, "created in-memory collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: Vec<VectorRecord>) -> Result<()> {
        let mut guard = self.collections.write().await;
        let col = guard.get_mut(collection).ok_or_else(|| missing(collection))?;
        if let Some(bad) = records.iter().find(|r| r.vector.len() != col.dim) {
            return Err(IndexError::Storage(format!(
                "vector of length {} does not fit collection dimension {}",
                bad.vector.len(),
                col.dim
            )));
        }
        for record in records {
            match col.records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => col.records.push(record),
            }
        }
        Ok(())
    }

    async fn search(&self, collection: &str, vector: Vec<f32>, limit: usize) -> Result<Vec<SearchHit>> {
        let guard = self.collections.read().await;
        let col = guard.get(collection).ok_or_else(|| missing(collection))?;
        let mut scored: Vec<(f32, &VectorRecord)> = col
            .records
            .iter()
            .map(|r| (Self::cosine_similarity(&vector, &r.vector), r))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(score, r)| SearchHit { payload: r.payload.clone(), score })
            .collect())
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<ChunkPayload>> {
        let guard = self.collections.read().await;
        let col = guard.get(collection).ok_or_else(|| missing(collection))?;
        Ok(col.records.iter().take(limit).map(|r| r.payload.clone()).collect())
    }
}
