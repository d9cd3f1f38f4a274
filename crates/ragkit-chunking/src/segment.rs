//! Structural-unit segmentation for the dynamic chunker.
//!
//! Builds an ordered sequence of units (headings, tables, paragraphs)
//! whose spans tile the source text exactly. Chunk boundaries are then
//! chosen as ranges over this sequence, which is what guarantees no
//! character is lost or duplicated downstream.

use ragkit_core::types::{Span, StructuralHints};

use crate::text::paragraph_spans_in;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Paragraph,
    Heading,
    Table,
}

#[derive(Debug, Clone, Copy)]
pub struct Unit {
    pub kind: UnitKind,
    pub span: Span,
}

fn valid_span(text: &str, span: &Span) -> bool {
    span.start < span.end
        && span.end <= text.len()
        && text.is_char_boundary(span.start)
        && text.is_char_boundary(span.end)
}

/// Segment `text` into structural units using ingestion hints.
///
/// Malformed hint spans are ignored; overlapping hints keep the first.
/// The gaps between hinted regions are split into paragraphs. The
/// returned spans tile `[0, text.len())`.
pub fn segment(text: &str, hints: &StructuralHints) -> Vec<Unit> {
    let mut marked: Vec<Unit> = Vec::new();
    for span in &hints.headings {
        if valid_span(text, span) {
            marked.push(Unit {
                kind: UnitKind::Heading,
                span: *span,
            });
        }
    }
    for span in &hints.tables {
        if valid_span(text, span) {
            marked.push(Unit {
                kind: UnitKind::Table,
                span: *span,
            });
        }
    }
    marked.sort_by_key(|u| (u.span.start, u.span.end));
    let mut kept: Vec<Unit> = Vec::new();
    for unit in marked {
        if kept
            .last()
            .map_or(true, |prev| prev.span.end <= unit.span.start)
        {
            kept.push(unit);
        }
    }

    let mut units: Vec<Unit> = Vec::new();
    let mut cursor = 0usize;
    for unit in kept {
        if unit.span.start > cursor {
            for span in paragraph_spans_in(text, cursor, unit.span.start) {
                units.push(Unit {
                    kind: UnitKind::Paragraph,
                    span,
                });
            }
        }
        cursor = unit.span.end;
        units.push(unit);
    }
    if cursor < text.len() {
        for span in paragraph_spans_in(text, cursor, text.len()) {
            units.push(Unit {
                kind: UnitKind::Paragraph,
                span,
            });
        }
    }

    absorb_blank_units(text, units)
}

/// Whitespace-only units would become empty chunks; fold them into a
/// neighbor instead (preceding unit if any, otherwise the following one).
fn absorb_blank_units(text: &str, units: Vec<Unit>) -> Vec<Unit> {
    let blank = |s: Span| text[s.start..s.end].trim().is_empty();
    let mut merged: Vec<Unit> = Vec::new();
    for mut unit in units {
        match merged.last_mut() {
            Some(prev) if blank(unit.span) => {
                prev.span.end = unit.span.end;
                continue;
            }
            Some(prev) if blank(prev.span) => {
                unit.span.start = prev.span.start;
                merged.pop();
            }
            _ => {}
        }
        merged.push(unit);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(text: &str, units: &[Unit]) {
        assert!(!units.is_empty());
        assert_eq!(units[0].span.start, 0);
        assert_eq!(units.last().unwrap().span.end, text.len());
        for pair in units.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }

    #[test]
    fn plain_text_segments_into_paragraphs() {
        let text = "one one one\n\ntwo two\n\nthree";
        let units = segment(text, &StructuralHints::default());
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| u.kind == UnitKind::Paragraph));
        tiles(text, &units);
    }

    #[test]
    fn table_hint_becomes_atomic_unit() {
        let text = "intro paragraph\n\na | b\n1 | 2\n\noutro paragraph";
        let table_start = text.find("a | b").unwrap();
        let table_end = text.find("1 | 2").unwrap() + "1 | 2".len();
        let hints = StructuralHints {
            tables: vec![Span::new(table_start, table_end)],
            ..StructuralHints::default()
        };
        let units = segment(text, &hints);
        tiles(text, &units);
        assert!(units.iter().any(|u| u.kind == UnitKind::Table));
    }

    #[test]
    fn malformed_hints_are_ignored() {
        let text = "short text";
        let hints = StructuralHints {
            headings: vec![Span::new(5, 500), Span::new(3, 3)],
            ..StructuralHints::default()
        };
        let units = segment(text, &hints);
        tiles(text, &units);
        assert!(units.iter().all(|u| u.kind == UnitKind::Paragraph));
    }

    #[test]
    fn overlapping_hints_keep_first() {
        let text = "aaaa bbbb cccc dddd";
        let hints = StructuralHints {
            headings: vec![Span::new(0, 9), Span::new(5, 14)],
            ..StructuralHints::default()
        };
        let units = segment(text, &hints);
        tiles(text, &units);
        assert_eq!(
            units
                .iter()
                .filter(|u| u.kind == UnitKind::Heading)
                .count(),
            1
        );
    }
}
