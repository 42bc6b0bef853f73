//! Embedded LanceDB backend: one table per collection.

use arrow_array::types::Float32Type;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int64Array, RecordBatch, RecordBatchIterator, StringArray,
};
use async_trait::async_trait;
use docqa_core::types::{ChunkPayload, SearchHit};
use futures::TryStreamExt;
use lancedb::database::CreateTableMode;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType, Table};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{IndexError, Result};
use crate::schema::{build_arrow_schema, vector_dim};
use crate::store::{NearestNeighbor, VectorRecord};

pub struct LanceStore {
    conn: Connection,
}

impl LanceStore {
    pub async fn connect(uri: &str) -> Result<Self> {
        info!("Opening LanceDB at {uri}");
        Ok(Self { conn: connect(uri).execute().await? })
    }

    async fn open(&self, collection: &str) -> Result<Table> {
        Ok(self.conn.open_table(collection).execute().await?)
    }
}

#[async_trait]
impl NearestNeighbor for LanceStore {
    async fn collection_dim(&self, collection: &str) -> Result<Option<usize>> {
        let names = self.conn.table_names().execute().await?;
        if !names.iter().any(|n| n == collection) {
            return Ok(None);
        }
        let schema = self.open(collection).await?.schema().await?;
        vector_dim(&schema)
            .map(Some)
            .ok_or_else(|| IndexError::Decode(format!("table {collection} has no vector column")))
    }

    async fn create_collection(&self, collection: &str, dim: usize) -> Result<()> {
        self.conn
            .create_empty_table(collection, build_arrow_schema(dim))
            .mode(CreateTableMode::Overwrite)
            .execute()
            .await?;
        debug!(collection, dim, "created LanceDB table");
        Ok(())
    }

    async fn upsert(&self, collection: &str, records: Vec<VectorRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let table = self.open(collection).await?;
        let schema = table.schema().await?;
        let dim = vector_dim(&schema)
            .ok_or_else(|| IndexError::Decode(format!("table {collection} has no vector column")))?;
        let batch = records_to_batch(&records, dim)?;
        let reader = RecordBatchIterator::new(vec![Ok(batch)], build_arrow_schema(dim));
        table.add(Box::new(reader)).execute().await?;
        Ok(())
    }

    async fn search(&self, collection: &str, vector: Vec<f32>, limit: usize) -> Result<Vec<SearchHit>> {
        let table = self.open(collection).await?;
        if table.count_rows(None).await? == 0 {
            return Ok(Vec::new());
        }
        let mut stream = table
            .vector_search(vector)?
            .distance_type(DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await?;
        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| IndexError::Decode("search result has no _distance column".into()))?;
            for (i, payload) in batch_to_payloads(&batch)?.into_iter().enumerate() {
                hits.push(SearchHit { payload, score: 1.0 - distances.value(i) });
            }
        }
        Ok(hits)
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<ChunkPayload>> {
        let table = self.open(collection).await?;
        let mut stream = table.query().limit(limit).execute().await?;
        let mut out = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            out.extend(batch_to_payloads(&batch)?);
        }
        out.truncate(limit);
        Ok(out)
    }
}

fn records_to_batch(records: &[VectorRecord], dim: usize) -> Result<RecordBatch> {
    if let Some(bad) = records.iter().find(|r| r.vector.len() != dim) {
        return Err(IndexError::Storage(format!(
            "vector of length {} does not fit collection dimension {dim}",
            bad.vector.len()
        )));
    }
    let strings = |f: fn(&VectorRecord) -> &str| -> Arc<dyn Array> {
        Arc::new(StringArray::from_iter_values(records.iter().map(f)))
    };
    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        records.iter().map(|r| Some(r.vector.iter().copied().map(Some))),
        dim as i32,
    );
    Ok(RecordBatch::try_new(
        build_arrow_schema(dim),
        vec![
            strings(|r| r.id.as_str()),
            strings(|r| r.payload.text.as_str()),
            strings(|r| r.payload.file_name.as_str()),
            strings(|r| r.payload.file_type.as_str()),
            strings(|r| r.payload.summary.as_str()),
            strings(|r| r.payload.source.as_str()),
            Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.payload.chunk_id as i64))),
            Arc::new(vectors),
        ],
    )?)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| IndexError::Decode(format!("missing column {name}")))
}

fn batch_to_payloads(batch: &RecordBatch) -> Result<Vec<ChunkPayload>> {
    let text = string_column(batch, "text")?;
    let file_name = string_column(batch, "file_name")?;
    let file_type = string_column(batch, "file_type")?;
    let summary = string_column(batch, "summary")?;
    let source = string_column(batch, "source")?;
    let chunk_id = batch
        .column_by_name("chunk_id")
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
        .ok_or_else(|| IndexError::Decode("missing column chunk_id".into()))?;

    Ok((0..batch.num_rows())
        .map(|i| ChunkPayload {
            text: text.value(i).to_string(),
            file_name: file_name.value(i).to_string(),
            file_type: file_type.value(i).to_string(),
            summary: summary.value(i).to_string(),
            source: source.value(i).to_string(),
            chunk_id: usize::try_from(chunk_id.value(i)).unwrap_or_default(),
        })
        .collect())
}
