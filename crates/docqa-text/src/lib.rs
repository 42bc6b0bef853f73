//! docqa-text
//!
//! Converts a stored file into one normalized text string. Every reader
//! fails closed: an unreadable or malformed file yields empty text, which
//! callers treat as the single failure signal.

mod docx;
mod normalize;
mod pdf;
mod plain;
mod tabular;

use docqa_core::types::DocumentKind;
use std::path::Path;
use tracing::{debug, warn};

pub use normalize::{collapse_whitespace, decode_utf8_dropping_invalid, preview};

/// Result of [`extract`]: normalized text plus the resolved document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub kind: DocumentKind,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Read `path` and extract its text, dispatching on the file extension.
pub fn extract(path: &Path) -> Extraction {
    let kind = DocumentKind::from_path(path);
    match std::fs::read(path) {
        Ok(bytes) => extract_bytes(&bytes, kind),
        Err(e) => {
            warn!("Cannot read {}: {e}", path.display());
            Extraction { text: String::new(), kind }
        }
    }
}

/// Extract text from raw bytes already known to be of type `kind`.
pub fn extract_bytes(bytes: &[u8], kind: DocumentKind) -> Extraction {
    let structured = match kind {
        DocumentKind::Text => plain::decode(bytes),
        DocumentKind::Tabular => tabular::canonicalize(bytes),
        DocumentKind::Pdf => pdf::extract_text(bytes),
        DocumentKind::Docx => docx::extract_text(bytes),
    };
    let mut text = collapse_whitespace(&structured);
    if text.is_empty() && kind.has_raw_fallback() && !bytes.is_empty() {
        debug!(%kind, "structured extraction was blank, decoding raw bytes");
        text = collapse_whitespace(&decode_utf8_dropping_invalid(bytes));
    }
    Extraction { text, kind }
}

/// Document types and the parser compiled in for each.
pub fn supported_parsers() -> Vec<(DocumentKind, &'static str)> {
    vec![
        (DocumentKind::Text, "encoding_rs (utf-8, utf-8-sig, utf-16, windows-1251, latin-1)"),
        (DocumentKind::Tabular, "csv"),
        (DocumentKind::Pdf, "pdf-extract"),
        (DocumentKind::Docx, "zip + quick-xml"),
    ]
}
