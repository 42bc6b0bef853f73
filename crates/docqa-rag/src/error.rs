use docqa_llm::LlmError;
use docqa_vector::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("answer generation failed: {0}")]
    Completion(#[from] LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;
