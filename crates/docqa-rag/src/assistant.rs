use docqa_llm::{ChatMessage, CompletionService};
use docqa_vector::VectorIndex;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;

pub const DIRECT_MODEL: &str = "direct";
pub const NOTHING_INDEXED: &str = "Nothing has been indexed yet. Upload a file and ask again.";
pub const ANSWER_NOT_FOUND: &str = "The answer was not found in the uploaded materials.";
pub const DIRECT_LIST_LIMIT: usize = 10;

const SYSTEM_PROMPT: &str = "You are a retrieval assistant. Use ONLY the supplied fragments. \
If they do not contain the answer, say so.";

static GENERIC_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(что это|что за файл|о ч[её]м файл|what is it|what is this|about file)\b")
        .expect("generic question pattern is valid")
});

/// Questions about the uploaded material as a whole rather than its content.
pub fn is_generic_question(question: &str) -> bool {
    GENERIC_QUESTION.is_match(question.trim_start())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
    pub used_model: String,
}

/// Answers questions from the index, with or without the language model.
#[derive(Clone)]
pub struct Assistant {
    index: VectorIndex,
    llm: Arc<dyn CompletionService>,
    score_threshold: f32,
}

impl Assistant {
    pub fn new(index: VectorIndex, llm: Arc<dyn CompletionService>) -> Self {
        Self { index, llm, score_threshold: 0.0 }
    }

    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    /// Search first. With no usable hits, or for a generic question, list
    /// the indexed documents; otherwise ask the model, grounded on the hits.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<Answer> {
        let hits = self.index.search(question, top_k, self.score_threshold).await?;
        let good: Vec<_> = hits.into_iter().filter(|h| h.has_text()).collect();

        if good.is_empty() || is_generic_question(question) {
            debug!(hits = good.len(), "answering from the document list");
            return self.direct_answer().await;
        }

        let context = good.iter().map(|h| h.payload.text.as_str()).collect::<Vec<_>>().join("\n- ");
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("Question: {question}\n\nFragments:\n- {context}")),
        ];
        let reply = self.llm.chat(&messages).await?;

        let mut sources: Vec<String> = Vec::new();
        for hit in &good {
            let name = &hit.payload.file_name;
            if !name.is_empty() && !sources.contains(name) {
                sources.push(name.clone());
            }
        }
        info!(fragments = good.len(), sources = sources.len(), "grounded answer");
        Ok(Answer {
            answer: if reply.is_empty() { ANSWER_NOT_FOUND.to_string() } else { reply },
            sources,
            used_model: self.llm.model().to_string(),
        })
    }

    async fn direct_answer(&self) -> Result<Answer> {
        let docs = self.index.list_unique_documents(DIRECT_LIST_LIMIT).await?;
        if docs.is_empty() {
            return Ok(Answer { answer: NOTHING_INDEXED.to_string(), sources: Vec::new(), used_model: DIRECT_MODEL.into() });
        }
        let lines: Vec<String> = docs
            .iter()
            .map(|d| {
                let file_type = if d.file_type.is_empty() { "?" } else { d.file_type.as_str() };
                let summary = match d.summary.trim() {
                    "" => "(no summary)",
                    s => s,
                };
                format!("- {} ({}): {}", d.file_name, file_type, summary)
            })
            .collect();
        Ok(Answer {
            answer: format!("Uploaded files:\n{}", lines.join("\n")),
            sources: docs.into_iter().map(|d| d.file_name).collect(),
            used_model: DIRECT_MODEL.into(),
        })
    }
}
