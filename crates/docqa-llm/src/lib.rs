//! Client for an Ollama-compatible completion service and the document
//! summarizer built on it.

pub mod client;
pub mod error;
pub mod summarizer;

pub use client::{ChatMessage, CompletionService, HealthReport, OllamaClient};
pub use error::{LlmError, Result};
pub use summarizer::Summarizer;
