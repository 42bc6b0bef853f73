//! Domain types shared by extraction, indexing and answering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The closed set of document types the extractor understands.
///
/// Unknown extensions resolve to [`DocumentKind::Text`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    #[serde(rename = "txt")]
    Text,
    #[serde(rename = "csv")]
    Tabular,
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "docx")]
    Docx,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" | "md" | "json" => Self::Text,
            "csv" => Self::Tabular,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            _ => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Tabular => "csv",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// Types whose raw bytes are worth decoding when structured extraction
    /// comes back blank.
    pub fn has_raw_fallback(&self) -> bool {
        matches!(self, Self::Text | Self::Tabular)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level metadata copied into every record of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub file_name: String,
    pub file_type: DocumentKind,
    pub summary: String,
    pub source: String,
}

/// Payload persisted next to each vector.
///
/// `file_type` stays a plain string: records written by other tools may
/// carry types this crate does not know.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub chunk_id: usize,
}

impl ChunkPayload {
    pub fn new(meta: &DocumentMeta, chunk_id: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_name: meta.file_name.clone(),
            file_type: meta.file_type.as_str().to_string(),
            summary: meta.summary.clone(),
            source: meta.source.clone(),
            chunk_id,
        }
    }
}

/// A scored payload returned by similarity search. Higher is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub payload: ChunkPayload,
    pub score: f32,
}

impl SearchHit {
    pub fn has_text(&self) -> bool {
        !self.payload.text.trim().is_empty()
    }
}

/// One entry of the document catalog built from stored payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    pub file_name: String,
    pub file_type: String,
    pub summary: String,
}

impl From<&ChunkPayload> for DocumentSummary {
    fn from(p: &ChunkPayload) -> Self {
        Self {
            file_name: p.file_name.clone(),
            file_type: p.file_type.clone(),
            summary: p.summary.clone(),
        }
    }
}
