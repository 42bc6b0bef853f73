//! docqa-core
//!
//! Shared configuration, error and domain types for the docqa workspace,
//! plus the sliding-window chunker used by ingestion.

pub mod chunker;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;
