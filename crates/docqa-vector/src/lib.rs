//! docqa-vector
//!
//! Vector index over a pluggable nearest-neighbor backend (Qdrant, embedded
//! LanceDB, or in-memory).

pub mod error;
pub mod index;
pub mod lance;
pub mod memory;
pub mod qdrant;
pub mod schema;
pub mod store;

pub use error::{IndexError, Result};
pub use index::{collection_name, CollectionStatus, VectorIndex};
pub use lance::LanceStore;
pub use memory::MemoryStore;
pub use qdrant::QdrantStore;
pub use store::{NearestNeighbor, VectorRecord};

use docqa_core::config::{expand_path, IndexBackend, IndexSettings};
use docqa_embed::DualEncoder;
use std::sync::Arc;
use std::time::Duration;

/// Connect to the backend selected by `settings.backend`.
pub async fn connect_store(settings: &IndexSettings) -> Result<Arc<dyn NearestNeighbor>> {
    Ok(match settings.backend {
        IndexBackend::Qdrant => Arc::new(QdrantStore::new(
            &settings.url,
            settings.api_key.as_deref(),
            Duration::from_secs(settings.timeout_secs),
        )?),
        IndexBackend::Lancedb => {
            let uri = expand_path(&settings.url).to_string_lossy().to_string();
            Arc::new(LanceStore::connect(&uri).await?)
        }
        IndexBackend::Memory => Arc::new(MemoryStore::new()),
    })
}

/// How [`open_index`] treats an existing collection of the wrong dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Fail with [`IndexError::DimensionMismatch`].
    Verify,
    /// Drop it and create it empty.
    Migrate,
}

/// Connect, build the index for `encoder` and run the collection check once.
pub async fn open_index(
    settings: &IndexSettings,
    encoder: DualEncoder,
    mode: OpenMode,
) -> Result<(VectorIndex, CollectionStatus)> {
    let store = connect_store(settings).await?;
    let index = VectorIndex::new(store, encoder, &settings.collection).with_scan_limit(settings.scan_limit);
    let status = match mode {
        OpenMode::Verify => index.verify_collection().await?,
        OpenMode::Migrate => index.ensure_collection().await?,
    };
    Ok((index, status))
}
