use docqa_core::chunker::Chunker;
use docqa_core::config::Settings;
use docqa_embed::{shared_embedder, DualEncoder};
use docqa_llm::{HealthReport, OllamaClient, Summarizer};
use docqa_vector::{open_index, CollectionStatus, IndexError, OpenMode, VectorIndex};
use std::sync::Arc;
use tracing::info;

use crate::assistant::Assistant;
use crate::error::Result;
use crate::ingest::Ingestor;

/// Everything wired from [`Settings`]: one index, one model client.
pub struct Pipeline {
    pub index: VectorIndex,
    pub assistant: Assistant,
    pub ingestor: Ingestor,
    pub collection_status: CollectionStatus,
    llm: Arc<OllamaClient>,
}

impl Pipeline {
    /// Load the shared embedder, connect the index and the completion client.
    ///
    /// A collection of the wrong dimension fails with
    /// [`IndexError::DimensionMismatch`]; only [`Pipeline::migrate`] recreates it.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        Self::open(settings, OpenMode::Verify).await
    }

    /// Like [`Pipeline::from_settings`], dropping and recreating a collection
    /// whose dimension no longer matches the embedder.
    pub async fn migrate(settings: &Settings) -> Result<Self> {
        Self::open(settings, OpenMode::Migrate).await
    }

    async fn open(settings: &Settings, mode: OpenMode) -> Result<Self> {
        let embedder = shared_embedder(&settings.embedding).map_err(|e| IndexError::Embedding(format!("{e:#}")))?;
        let encoder = DualEncoder::new(embedder);
        let (index, collection_status) = open_index(&settings.index, encoder, mode).await?;
        info!(collection = index.collection(), ?collection_status, "Index ready");

        let llm = Arc::new(OllamaClient::new(&settings.llm)?);
        let assistant = Assistant::new(index.clone(), llm.clone()).with_score_threshold(settings.index.score_threshold);
        let ingestor = Ingestor::new(
            index.clone(),
            Summarizer::new(llm.clone()),
            Chunker::new(settings.chunking),
            settings.storage.upload_path(),
        );
        Ok(Self { index, assistant, ingestor, collection_status, llm })
    }

    pub async fn llm_health(&self) -> Result<HealthReport> {
        Ok(self.llm.health().await?)
    }
}
