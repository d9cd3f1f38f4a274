//! Dynamic chunking: boundary-aware segmentation within token bounds.
//!
//! Structural units are accumulated greedily until the next unit would
//! exceed `max_tokens`. A single oversized unit is force-split at
//! sentence boundaries (row boundaries for tables), never mid-word, and
//! those sub-pieces are emitted as-is without re-merging. After
//! accumulation, chunks below `min_tokens` merge into a neighbor when
//! that stays within `max_tokens`; otherwise they are kept and flagged,
//! never discarded.

use ragkit_core::config::ChunkingConfig;
use ragkit_core::error::Result;
use ragkit_core::types::{Chunk, Span, StructuralHints, StructuralRole};

use crate::segment::{segment, Unit, UnitKind};
use crate::text::{count_tokens, detect_language, row_spans, sentence_spans, tokenize};

pub struct DynamicChunker {
    min_tokens: usize,
    max_tokens: usize,
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    kind: UnitKind,
    span: Span,
    tokens: usize,
    /// Result of a force-split; stays standalone through merging.
    atomic: bool,
}

#[derive(Debug, Clone, Copy)]
struct Draft {
    span: Span,
    tokens: usize,
    piece_count: usize,
    kind: UnitKind,
    atomic: bool,
    below_min: bool,
}

impl Draft {
    fn from_piece(piece: &Piece) -> Self {
        Self {
            span: piece.span,
            tokens: piece.tokens,
            piece_count: 1,
            kind: piece.kind,
            atomic: piece.atomic,
            below_min: false,
        }
    }
}

impl DynamicChunker {
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_tokens: config.min_tokens,
            max_tokens: config.max_tokens,
        })
    }

    /// Chunk `text` along structural boundaries. The resulting spans
    /// tile the source text: no gaps, no overlaps.
    pub fn chunk(&self, doc_id: &str, text: &str, hints: &StructuralHints) -> Vec<Chunk> {
        if count_tokens(text) == 0 {
            return Vec::new();
        }

        let units = segment(text, hints);
        let pieces = self.split_oversized(text, units);
        let mut drafts = self.accumulate(pieces);
        self.merge_short(&mut drafts);

        drafts
            .iter()
            .enumerate()
            .map(|(ordinal, draft)| {
                let content = text[draft.span.start..draft.span.end].to_string();
                let language = detect_language(&content);
                let role = if draft.piece_count == 1 {
                    match draft.kind {
                        UnitKind::Paragraph => Some(StructuralRole::Body),
                        UnitKind::Heading => Some(StructuralRole::Heading),
                        UnitKind::Table => Some(StructuralRole::Table),
                    }
                } else {
                    Some(StructuralRole::Body)
                };
                Chunk {
                    id: format!("{doc_id}:{ordinal}"),
                    doc_id: doc_id.to_string(),
                    ordinal,
                    token_count: draft.tokens,
                    language,
                    role,
                    span: draft.span,
                    below_min_tokens: draft.below_min,
                    content,
                }
            })
            .collect()
    }

    fn split_oversized(&self, text: &str, units: Vec<Unit>) -> Vec<Piece> {
        let mut pieces = Vec::with_capacity(units.len());
        for unit in units {
            let tokens = count_tokens(&text[unit.span.start..unit.span.end]);
            if tokens <= self.max_tokens {
                pieces.push(Piece {
                    kind: unit.kind,
                    span: unit.span,
                    tokens,
                    atomic: false,
                });
                continue;
            }
            for span in self.force_split(text, &unit) {
                let tokens = count_tokens(&text[span.start..span.end]);
                pieces.push(Piece {
                    kind: unit.kind,
                    span,
                    tokens,
                    atomic: true,
                });
            }
        }
        pieces
    }

    /// Split one oversized unit at its internal boundaries: rows for
    /// tables, sentences otherwise. A boundary segment that is itself
    /// oversized falls back to token-boundary windows.
    fn force_split(&self, text: &str, unit: &Unit) -> Vec<Span> {
        let slice = &text[unit.span.start..unit.span.end];
        let parts = match unit.kind {
            UnitKind::Table => row_spans(slice),
            _ => sentence_spans(slice),
        };

        let mut out: Vec<Span> = Vec::new();
        let mut current: Option<(Span, usize)> = None;
        for part in parts {
            let part_tokens = count_tokens(&slice[part.start..part.end]);
            if part_tokens > self.max_tokens {
                if let Some((span, _)) = current.take() {
                    out.push(span);
                }
                out.extend(split_at_token_windows(slice, part, self.max_tokens));
                continue;
            }
            current = match current {
                None => Some((part, part_tokens)),
                Some((mut span, tokens)) if tokens + part_tokens <= self.max_tokens => {
                    span.end = part.end;
                    Some((span, tokens + part_tokens))
                }
                Some((span, _)) => {
                    out.push(span);
                    Some((part, part_tokens))
                }
            };
        }
        if let Some((span, _)) = current {
            out.push(span);
        }

        out.into_iter()
            .map(|s| Span::new(unit.span.start + s.start, unit.span.start + s.end))
            .collect()
    }

    fn accumulate(&self, pieces: Vec<Piece>) -> Vec<Draft> {
        let mut drafts: Vec<Draft> = Vec::new();
        let mut current: Option<Draft> = None;
        for piece in pieces {
            if piece.atomic {
                if let Some(draft) = current.take() {
                    drafts.push(draft);
                }
                drafts.push(Draft::from_piece(&piece));
                continue;
            }
            current = match current {
                None => Some(Draft::from_piece(&piece)),
                Some(mut draft) if draft.tokens + piece.tokens <= self.max_tokens => {
                    draft.span.end = piece.span.end;
                    draft.tokens += piece.tokens;
                    draft.piece_count += 1;
                    Some(draft)
                }
                Some(draft) => {
                    drafts.push(draft);
                    Some(Draft::from_piece(&piece))
                }
            };
        }
        if let Some(draft) = current {
            drafts.push(draft);
        }
        drafts
    }

    /// Merge below-minimum drafts into a neighbor: forward unless the
    /// draft is last, then backward. Force-split pieces never re-merge.
    /// When no merge fits under `max_tokens` the draft keeps its content
    /// and is flagged instead.
    fn merge_short(&self, drafts: &mut Vec<Draft>) {
        let mut i = 0usize;
        while i < drafts.len() {
            if drafts[i].tokens >= self.min_tokens {
                i += 1;
                continue;
            }
            if drafts[i].atomic {
                drafts[i].below_min = true;
                i += 1;
                continue;
            }
            let last = i + 1 == drafts.len();
            let neighbor = if last {
                if i == 0 {
                    None
                } else {
                    Some(i - 1)
                }
            } else {
                Some(i + 1)
            };
            let mergeable = neighbor.map_or(false, |j| {
                !drafts[j].atomic && drafts[i].tokens + drafts[j].tokens <= self.max_tokens
            });
            match neighbor {
                Some(j) if mergeable => {
                    let (a, b) = if j < i { (j, i) } else { (i, j) };
                    drafts[a].tokens += drafts[b].tokens;
                    drafts[a].span.end = drafts[b].span.end;
                    drafts[a].piece_count += drafts[b].piece_count;
                    drafts.remove(b);
                    // re-examine the merged draft from its own index
                    i = a;
                }
                _ => {
                    drafts[i].below_min = true;
                    i += 1;
                }
            }
        }
    }
}

/// Window an oversized segment at token boundaries (never mid-word) so
/// every window stays within `max_tokens`. Windows tile the segment.
fn split_at_token_windows(slice: &str, span: Span, max_tokens: usize) -> Vec<Span> {
    let sub = &slice[span.start..span.end];
    let tokens = tokenize(sub);
    let mut spans = Vec::new();
    let mut idx = 0usize;
    let mut window_start = span.start;
    while idx < tokens.len() {
        let end_idx = (idx + max_tokens).min(tokens.len());
        let end = if end_idx == tokens.len() {
            span.end
        } else {
            span.start + tokens[end_idx].start
        };
        spans.push(Span::new(window_start, end));
        window_start = end;
        idx = end_idx;
    }
    spans
}
