//! Fixed-size chunking: sliding token windows with bounded overlap.

use ragkit_core::config::ChunkingConfig;
use ragkit_core::error::Result;
use ragkit_core::types::{Chunk, Span};

use crate::text::{detect_language, tokenize};

/// Splits text into consecutive windows of `target_token_size` tokens,
/// each window starting `target_token_size - overlap_tokens` tokens
/// after the previous one. Deterministic: identical input and
/// configuration always produce identical chunk boundaries.
pub struct FixedChunker {
    target_tokens: usize,
    overlap_tokens: usize,
    min_tokens: usize,
}

impl FixedChunker {
    /// Fails fast on invalid bounds (e.g. overlap >= target size); no
    /// per-chunk configuration errors exist.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            target_tokens: config.target_token_size,
            overlap_tokens: config.overlap_tokens,
            min_tokens: config.min_tokens,
        })
    }

    pub fn chunk(&self, doc_id: &str, text: &str) -> Vec<Chunk> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Vec::new();
        }

        let step = self.target_tokens - self.overlap_tokens;
        let mut windows: Vec<(usize, usize)> = Vec::new();
        let mut start = 0usize;
        loop {
            let end = (start + self.target_tokens).min(tokens.len());
            windows.push((start, end));
            if end == tokens.len() {
                break;
            }
            start += step;
        }

        // A short final remainder is merged into the previous window
        // rather than emitted standalone.
        if windows.len() >= 2 {
            let (last_start, last_end) = windows[windows.len() - 1];
            if last_end - last_start < self.min_tokens {
                windows.pop();
                if let Some(prev) = windows.last_mut() {
                    prev.1 = last_end;
                }
            }
        }

        windows
            .iter()
            .enumerate()
            .map(|(ordinal, &(a, b))| {
                let span = Span::new(tokens[a].start, tokens[b - 1].end);
                let content = text[span.start..span.end].to_string();
                let language = detect_language(&content);
                Chunk {
                    id: format!("{doc_id}:{ordinal}"),
                    doc_id: doc_id.to_string(),
                    ordinal,
                    token_count: b - a,
                    language,
                    role: None,
                    span,
                    below_min_tokens: b - a < self.min_tokens,
                    content,
                }
            })
            .collect()
    }
}
