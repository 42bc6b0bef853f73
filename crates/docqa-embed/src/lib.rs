//! Sentence embeddings for passages and queries.
//!
//! The E5 family expects every input to be tagged as either a passage or a
//! query. [`DualEncoder`] owns those tags so callers never build them by hand.

mod device;
mod fake;
mod model;
mod pool;
mod tokenize;

use anyhow::{anyhow, Result};
use docqa_core::config::{expand_path, EmbeddingSettings};
use docqa_core::traits::Embedder;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub use device::select_device;
pub use fake::FakeEmbedder;
pub use model::E5Embedder;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_batch;

pub const PASSAGE_PREFIX: &str = "passage: ";
pub const QUERY_PREFIX: &str = "query: ";

/// Output width of e5-base-v2; the fake embedder uses the same width.
pub const E5_DIM: usize = 768;

const DEFAULT_MODEL_DIR: &str = "models/e5-base-v2";

/// Passage/query front end over any [`Embedder`].
#[derive(Clone)]
pub struct DualEncoder {
    inner: Arc<dyn Embedder>,
}

impl DualEncoder {
    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        Self { inner }
    }

    pub fn dim(&self) -> usize {
        self.inner.dim()
    }

    pub fn embed_passage(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_passages(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow!("embedder returned no vector"))
    }

    pub fn embed_passages(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let tagged: Vec<String> = texts.iter().map(|t| format!("{PASSAGE_PREFIX}{t}")).collect();
        self.inner.embed_batch(&tagged)
    }

    pub fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.inner
            .embed_batch(&[format!("{QUERY_PREFIX}{text}")])?
            .pop()
            .ok_or_else(|| anyhow!("embedder returned no vector"))
    }
}

static SHARED: OnceCell<Arc<dyn Embedder>> = OnceCell::new();

/// The process-wide embedder, loaded on first use.
///
/// Concurrent first callers block until one of them finishes loading; a
/// failed load is not cached and is retried by the next caller. Settings
/// passed after the first successful load are ignored.
pub fn shared_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    SHARED.get_or_try_init(|| build_embedder(settings)).cloned()
}

/// Build a fresh embedder according to `settings`, bypassing the shared one.
pub fn build_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    if settings.use_fake || fake_requested_by_env() {
        info!("Using FakeEmbedder ({E5_DIM}-d)");
        return Ok(Arc::new(FakeEmbedder::new(E5_DIM)));
    }
    let dir = resolve_model_dir(settings)?;
    Ok(Arc::new(E5Embedder::load(&dir)?))
}

fn fake_requested_by_env() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Model directory: `embedding.model_dir`, then `APP_MODEL_DIR`, then
/// `MODEL_DIR`, then `models/e5-base-v2`. The first existing one wins.
pub fn resolve_model_dir(settings: &EmbeddingSettings) -> Result<PathBuf> {
    let candidates = settings
        .model_dir
        .iter()
        .cloned()
        .chain(std::env::var("APP_MODEL_DIR").ok())
        .chain(std::env::var("MODEL_DIR").ok())
        .map(expand_path)
        .chain(std::iter::once(Path::new(DEFAULT_MODEL_DIR).to_path_buf()));
    for dir in candidates {
        if dir.exists() {
            info!("Using model dir: {}", dir.display());
            return Ok(dir);
        }
    }
    Err(anyhow!("Could not locate e5-base-v2 model directory"))
}
