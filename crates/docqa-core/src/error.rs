use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] Box<figment::Error>),
}

pub type Result<T> = std::result::Result<T, Error>;
