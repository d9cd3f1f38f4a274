//! Post-chunking invariant checks.
//!
//! The validator classifies chunks as accepted or rejected; it never
//! repairs or drops anything silently. The caller decides whether to
//! re-chunk or fail the document.

use std::collections::HashSet;
use std::fmt;

use ragkit_core::config::ChunkingConfig;
use ragkit_core::error::{Error, Result};
use ragkit_core::types::{Chunk, Span};

use crate::text::count_tokens;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    EmptyText,
    TokenCountOutOfBounds {
        tokens: usize,
        min: usize,
        max: usize,
    },
    DuplicateOrdinal {
        ordinal: usize,
    },
    DuplicateSpan {
        span: Span,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyText => write!(f, "empty or whitespace-only text"),
            RejectReason::TokenCountOutOfBounds { tokens, min, max } => {
                write!(f, "token count {tokens} outside hard bounds [{min}, {max}]")
            }
            RejectReason::DuplicateOrdinal { ordinal } => {
                write!(f, "ordinal {ordinal} already used in this document")
            }
            RejectReason::DuplicateSpan { span } => {
                write!(f, "span [{}, {}) already claimed", span.start, span.end)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Enforces hard token bounds independently of whatever the chunkers
/// report, catching upstream bugs. The hard bounds are deliberately
/// wider than the chunker bounds: flagged below-minimum chunks and
/// merged fixed tails are legitimate output, not bugs.
pub struct ChunkValidator {
    hard_min_tokens: usize,
    hard_max_tokens: usize,
}

impl ChunkValidator {
    pub fn new(hard_min_tokens: usize, hard_max_tokens: usize) -> Result<Self> {
        if hard_min_tokens == 0 || hard_min_tokens > hard_max_tokens {
            return Err(Error::InvalidConfig(format!(
                "hard token bounds [{hard_min_tokens}, {hard_max_tokens}] are not a valid range"
            )));
        }
        Ok(Self {
            hard_min_tokens,
            hard_max_tokens,
        })
    }

    /// Hard bounds derived from chunker config: any non-empty chunk up
    /// to twice `max_tokens` (a merged fixed tail can exceed the target).
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self {
            hard_min_tokens: 1,
            hard_max_tokens: config.max_tokens.saturating_mul(2),
        }
    }

    /// Partition chunks into accepted and rejected-with-reason. Token
    /// counts are recomputed from content rather than trusted.
    pub fn validate(&self, chunks: Vec<Chunk>) -> (Vec<Chunk>, Vec<(Chunk, RejectReason)>) {
        let mut accepted = Vec::with_capacity(chunks.len());
        let mut rejected = Vec::new();
        let mut seen_ordinals: HashSet<(String, usize)> = HashSet::new();
        let mut seen_spans: HashSet<(String, usize, usize)> = HashSet::new();

        for chunk in chunks {
            if let Some(reason) = self.check(&chunk, &mut seen_ordinals, &mut seen_spans) {
                rejected.push((chunk, reason));
            } else {
                accepted.push(chunk);
            }
        }
        (accepted, rejected)
    }

    fn check(
        &self,
        chunk: &Chunk,
        seen_ordinals: &mut HashSet<(String, usize)>,
        seen_spans: &mut HashSet<(String, usize, usize)>,
    ) -> Option<RejectReason> {
        if chunk.content.trim().is_empty() {
            return Some(RejectReason::EmptyText);
        }
        let tokens = count_tokens(&chunk.content);
        if tokens < self.hard_min_tokens || tokens > self.hard_max_tokens {
            return Some(RejectReason::TokenCountOutOfBounds {
                tokens,
                min: self.hard_min_tokens,
                max: self.hard_max_tokens,
            });
        }
        if !seen_ordinals.insert((chunk.doc_id.clone(), chunk.ordinal)) {
            return Some(RejectReason::DuplicateOrdinal {
                ordinal: chunk.ordinal,
            });
        }
        if !seen_spans.insert((chunk.doc_id.clone(), chunk.span.start, chunk.span.end)) {
            return Some(RejectReason::DuplicateSpan { span: chunk.span });
        }
        None
    }

    pub fn summary(
        accepted: &[Chunk],
        rejected: &[(Chunk, RejectReason)],
    ) -> ValidationSummary {
        ValidationSummary {
            total: accepted.len() + rejected.len(),
            accepted: accepted.len(),
            rejected: rejected.len(),
        }
    }
}
