use docqa_core::types::{ChunkPayload, DocumentMeta, DocumentSummary, SearchHit};
use docqa_embed::DualEncoder;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{IndexError, Result};
use crate::store::{NearestNeighbor, VectorRecord};

/// `top_k` used when a caller passes 0.
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_SCAN_LIMIT: usize = 1000;

/// What [`VectorIndex::ensure_collection`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CollectionStatus {
    Existing,
    Created,
    /// The old collection had the wrong dimension; it was dropped with all of its records.
    Recreated { previous_dim: usize },
}

/// Name of the active collection for a base name and embedding width.
pub fn collection_name(base: &str, dim: usize) -> String {
    format!("{base}_{dim}")
}

/// Embeds chunks and queries and keeps them in one dimension-typed collection.
#[derive(Clone)]
pub struct VectorIndex {
    store: Arc<dyn NearestNeighbor>,
    encoder: DualEncoder,
    collection: String,
    scan_limit: usize,
}

impl VectorIndex {
    pub fn new(store: Arc<dyn NearestNeighbor>, encoder: DualEncoder, base_collection: &str) -> Self {
        let collection = collection_name(base_collection, encoder.dim());
        Self { store, encoder, collection, scan_limit: DEFAULT_SCAN_LIMIT }
    }

    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit.max(1);
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn dim(&self) -> usize {
        self.encoder.dim()
    }

    /// Make sure the active collection exists with the embedder's dimension.
    ///
    /// A collection of any other dimension is recreated empty.
    pub async fn ensure_collection(&self) -> Result<CollectionStatus> {
        let dim = self.dim();
        let status = match self.store.collection_dim(&self.collection).await? {
            Some(existing) if existing == dim => CollectionStatus::Existing,
            Some(previous_dim) => {
                warn!(
                    collection = %self.collection,
                    previous_dim,
                    dim,
                    "Collection dimension mismatch; recreating it empty, all stored records are discarded"
                );
                self.store.create_collection(&self.collection, dim).await?;
                CollectionStatus::Recreated { previous_dim }
            }
            None => {
                info!(collection = %self.collection, dim, "Creating collection");
                self.store.create_collection(&self.collection, dim).await?;
                CollectionStatus::Created
            }
        };
        Ok(status)
    }

    /// Like [`ensure_collection`](Self::ensure_collection) but never destructive:
    /// a missing collection is created, a collection of another dimension is
    /// left untouched and reported as [`IndexError::DimensionMismatch`].
    pub async fn verify_collection(&self) -> Result<CollectionStatus> {
        let dim = self.dim();
        match self.store.collection_dim(&self.collection).await? {
            Some(existing) if existing == dim => Ok(CollectionStatus::Existing),
            Some(found) => Err(IndexError::DimensionMismatch { collection: self.collection.clone(), expected: dim, found }),
            None => {
                info!(collection = %self.collection, dim, "Creating collection");
                self.store.create_collection(&self.collection, dim).await?;
                Ok(CollectionStatus::Created)
            }
        }
    }

    /// Embed `chunks` in one batch and store one record per chunk, each under
    /// a fresh id. Returns the number of records written.
    pub async fn upsert(&self, chunks: &[String], meta: &DocumentMeta) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let vectors = self
            .encoder
            .embed_passages(chunks)
            .map_err(|e| IndexError::Embedding(format!("{e:#}")))?;
        if vectors.len() != chunks.len() {
            return Err(IndexError::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }
        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (text, vector))| VectorRecord {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: ChunkPayload::new(meta, i, text.as_str()),
            })
            .collect();
        let written = records.len();
        self.store.upsert(&self.collection, records).await?;
        debug!(file = %meta.file_name, written, "upserted chunks");
        Ok(written)
    }

    /// Nearest chunks to `query`, best first, keeping only `score >= score_threshold`.
    pub async fn search(&self, query: &str, top_k: usize, score_threshold: f32) -> Result<Vec<SearchHit>> {
        let limit = if top_k == 0 { DEFAULT_TOP_K } else { top_k };
        let vector = self
            .encoder
            .embed_query(query)
            .map_err(|e| IndexError::Embedding(format!("{e:#}")))?;
        let hits = self.store.search(&self.collection, vector, limit).await?;
        Ok(hits.into_iter().filter(|h| h.score >= score_threshold).collect())
    }

    /// The first `limit` distinct document names met while scanning up to
    /// the scan cap, in scan order. Not a complete catalog for large
    /// collections.
    pub async fn list_unique_documents(&self, limit: usize) -> Result<Vec<DocumentSummary>> {
        let payloads = self.store.scroll(&self.collection, self.scan_limit).await?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for payload in &payloads {
            if out.len() >= limit {
                break;
            }
            if payload.file_name.is_empty() || !seen.insert(payload.file_name.as_str()) {
                continue;
            }
            out.push(DocumentSummary::from(payload));
        }
        Ok(out)
    }
}
