//! docqa-rag
//!
//! Ingestion (store, extract, summarize, chunk, index) and question
//! answering over the indexed documents.

pub mod assistant;
pub mod error;
pub mod ingest;
pub mod pipeline;

pub use assistant::{is_generic_question, Answer, Assistant};
pub use error::{RagError, Result};
pub use ingest::{FileReport, Ingestor, UploadFile, UploadReport};
pub use pipeline::Pipeline;
