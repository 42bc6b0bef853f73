use std::sync::Arc;
use tracing::warn;

use crate::client::CompletionService;

/// Characters of document text sent to the model.
pub const SUMMARY_INPUT_CHARS: usize = 4000;
/// Characters of document text used when the model gives nothing back.
pub const FALLBACK_CHARS: usize = 500;

const PROMPT: &str = "Summarize this file in 2-4 sentences: topic, purpose, key sections.\n\n";

/// Short document summaries stored with every chunk. Never fails.
#[derive(Clone)]
pub struct Summarizer {
    service: Arc<dyn CompletionService>,
}

impl Summarizer {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub async fn summarize(&self, full_text: &str) -> String {
        let text = take_chars(full_text.trim(), SUMMARY_INPUT_CHARS);
        if text.is_empty() {
            return String::new();
        }
        match self.service.generate(&format!("{PROMPT}{text}")).await {
            Ok(summary) if !summary.is_empty() => summary,
            Ok(_) => take_chars(text, FALLBACK_CHARS).to_string(),
            Err(e) => {
                warn!("Summarization failed, using leading text instead: {e}");
                take_chars(text, FALLBACK_CHARS).to_string()
            }
        }
    }
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
