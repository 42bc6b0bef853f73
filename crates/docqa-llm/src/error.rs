use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected completion response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;
