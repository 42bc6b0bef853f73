use std::panic;
use tracing::warn;

/// Plain text of a PDF, or empty text on any parse failure.
///
/// The PDF parser can panic on malformed input; that is treated as a parse
/// failure too.
pub fn extract_text(bytes: &[u8]) -> String {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF parser panicked; treating file as unreadable");
            String::new()
        }
    }
}
