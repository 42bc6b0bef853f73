//! Qdrant over its REST API.

use async_trait::async_trait;
use docqa_core::types::{ChunkPayload, SearchHit};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{IndexError, Result};
use crate::store::{NearestNeighbor, VectorRecord};

pub struct QdrantStore {
    http: Client,
    base_url: String,
}

#[derive(Serialize)]
struct Point<'a> {
    id: &'a str,
    vector: &'a [f32],
    payload: &'a ChunkPayload,
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Deserialize)]
struct CollectionInfo {
    config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
    vectors: VectorsConfig,
}

/// A collection holds either one unnamed vector or a map of named ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum VectorsConfig {
    Single(VectorParams),
    Named(HashMap<String, VectorParams>),
}

#[derive(Deserialize)]
struct VectorParams {
    size: usize,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: Option<ChunkPayload>,
}

#[derive(Deserialize)]
struct ScrollPage {
    points: Vec<ScrolledPoint>,
}

#[derive(Deserialize)]
struct ScrolledPoint {
    #[serde(default)]
    payload: Option<ChunkPayload>,
}

impl QdrantStore {
    pub fn new(url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key).map_err(|e| IndexError::Decode(format!("invalid api key: {e}")))?;
            headers.insert(HeaderName::from_static("api-key"), value);
        }
        let http = Client::builder().timeout(timeout).default_headers(headers).build()?;
        Ok(Self { http, base_url: url.trim_end_matches('/').to_string() })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(IndexError::Service { status: status.as_u16(), body })
}

async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
    let envelope: Envelope<T> = check(response)
        .await?
        .json()
        .await
        .map_err(|e| IndexError::Decode(e.to_string()))?;
    Ok(envelope.result)
}

#[async_trait]
impl NearestNeighbor for QdrantStore {
    async fn collection_dim(&self, collection: &str) -> Result<Option<usize>> {
        let response = self.http.get(self.collection_url(collection)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let info: CollectionInfo = decode(response).await?;
        match info.config.params.vectors {
            VectorsConfig::Single(params) => Ok(Some(params.size)),
            VectorsConfig::Named(named) => {
                let names: Vec<&str> = named.keys().map(String::as_str).collect();
                warn!(collection, ?names, "Collection uses named vectors, which docqa does not write");
                Ok(Some(0))
            }
        }
    }

    async fn create_collection(&self, collection: &str, dim: usize) -> Result<()> {
        let url = self.collection_url(collection);
        let response = self.http.delete(&url).send().await?;
        if response.status() != StatusCode::NOT_FOUND {
            check(response).await?;
        }
        let body = json!({ "vectors": { "size": dim, "distance": "Cosine" } });
        check(self.http.put(&url).json(&body).send().await?).await?;
        debug!(collection, dim, "created Qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: Vec<VectorRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let points: Vec<Point<'_>> = records
            .iter()
            .map(|r| Point { id: &r.id, vector: &r.vector, payload: &r.payload })
            .collect();
        let url = format!("{}/points", self.collection_url(collection));
        let response = self
            .http
            .put(url)
            .query(&[("wait", "true")])
            .json(&json!({ "points": points }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn search(&self, collection: &str, vector: Vec<f32>, limit: usize) -> Result<Vec<SearchHit>> {
        let url = format!("{}/points/search", self.collection_url(collection));
        let body = json!({ "vector": vector, "limit": limit, "with_payload": true });
        let points: Vec<ScoredPoint> = decode(self.http.post(url).json(&body).send().await?).await?;
        Ok(points
            .into_iter()
            .map(|p| SearchHit { payload: p.payload.unwrap_or_default(), score: p.score })
            .collect())
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<ChunkPayload>> {
        let url = format!("{}/points/scroll", self.collection_url(collection));
        let body = json!({ "limit": limit, "with_payload": true, "with_vector": false });
        let page: ScrollPage = decode(self.http.post(url).json(&body).send().await?).await?;
        Ok(page.points.into_iter().map(|p| p.payload.unwrap_or_default()).collect())
    }
}
