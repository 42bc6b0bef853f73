//! Sliding-window chunking over normalized text.
//!
//! Windows are measured in characters (Unicode scalar values), never bytes,
//! so multi-byte scripts split at the same positions as ASCII text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { size: 800, overlap: 150 }
    }
}

impl ChunkingConfig {
    pub fn new(size: usize, overlap: usize) -> Self {
        Self { size, overlap }
    }

    /// Distance between window starts. Clamped to 1 when `overlap >= size`.
    pub fn stride(&self) -> usize {
        self.size.saturating_sub(self.overlap).max(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }
        // Byte offset of every char boundary, including the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let len = bounds.len() - 1;
        let size = self.config.size.max(1);
        let stride = self.config.stride();

        let mut chunks = Vec::with_capacity(len / stride + 1);
        let mut start = 0;
        while start < len {
            let end = (start + size).min(len);
            chunks.push(Chunk { index: chunks.len(), text: text[bounds[start]..bounds[end]].to_string() });
            start += stride;
        }
        chunks
    }
}

/// Chunk with the default 800/150 window.
pub fn chunk_text(text: &str) -> Vec<Chunk> {
    Chunker::default().chunk(text)
}
