use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("index service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("index service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("unexpected index response: {0}")]
    Decode(String),

    #[error("collection {collection} holds {found}-dimensional vectors but the embedder produces {expected}; run `docqa migrate` to recreate it")]
    DimensionMismatch { collection: String, expected: usize, found: usize },
}

impl From<lancedb::Error> for IndexError {
    fn from(e: lancedb::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<arrow_schema::ArrowError> for IndexError {
    fn from(e: arrow_schema::ArrowError) -> Self {
        Self::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
