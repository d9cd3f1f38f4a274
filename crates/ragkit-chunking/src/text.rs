//! Text analysis helpers: whitespace tokenization with byte offsets,
//! sentence/row/paragraph segmentation, and script detection.
//!
//! All span-producing functions tile their input: every byte of the
//! input belongs to exactly one returned span. Separators attach to the
//! preceding span so nothing is dropped.

use ragkit_core::types::{LanguageTag, Span};

/// A token is a maximal run of non-whitespace characters.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(Token {
                    text: &text[s..i],
                    start: s,
                    end: i,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(Token {
            text: &text[s..],
            start: s,
            end: text.len(),
        });
    }
    out
}

pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_sentence_terminal(ch: char) -> bool {
    // '؟' is the Arabic question mark
    matches!(ch, '.' | '!' | '?' | '؟')
}

/// Sentence spans: a sentence ends after a terminal character followed
/// by whitespace. Trailing whitespace belongs to the sentence it follows.
pub fn sentence_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut after_terminal = false;
    let mut in_gap = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if after_terminal {
                in_gap = true;
            }
            continue;
        }
        if in_gap {
            spans.push(Span::new(start, i));
            start = i;
            in_gap = false;
        }
        after_terminal = is_sentence_terminal(ch);
    }
    if start < text.len() {
        spans.push(Span::new(start, text.len()));
    }
    spans
}

/// Row spans for table blocks: one span per line, newlines attached to
/// the preceding row.
pub fn row_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut in_gap = false;
    for (i, ch) in text.char_indices() {
        if ch == '\n' || ch == '\r' {
            in_gap = true;
            continue;
        }
        if in_gap {
            spans.push(Span::new(start, i));
            start = i;
            in_gap = false;
        }
    }
    if start < text.len() {
        spans.push(Span::new(start, text.len()));
    }
    spans
}

/// Paragraph spans within `[start, end)` of `text`, split at blank-line
/// separators. The separator run is attached to the paragraph before it.
pub fn paragraph_spans_in(text: &str, start: usize, end: usize) -> Vec<Span> {
    let slice = &text[start..end];
    let bytes = slice.as_bytes();
    let mut spans = Vec::new();
    let mut para_start = start;
    let mut i = 0usize;
    while i < slice.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        // measure the whitespace run and count newlines in it
        let mut j = i;
        let mut newlines = 0usize;
        while j < slice.len() && matches!(bytes[j], b'\n' | b'\r' | b' ' | b'\t') {
            if bytes[j] == b'\n' {
                newlines += 1;
            }
            j += 1;
        }
        if newlines >= 2 && j < slice.len() {
            spans.push(Span::new(para_start, start + j));
            para_start = start + j;
        }
        i = j.max(i + 1);
    }
    if para_start < end {
        spans.push(Span::new(para_start, end));
    }
    spans
}

pub fn paragraph_spans(text: &str) -> Vec<Span> {
    paragraph_spans_in(text, 0, text.len())
}

fn is_rtl(ch: char) -> bool {
    matches!(ch,
        '\u{0590}'..='\u{05FF}'   // Hebrew
        | '\u{0600}'..='\u{06FF}' // Arabic
        | '\u{0750}'..='\u{077F}' // Arabic Supplement
        | '\u{08A0}'..='\u{08FF}' // Arabic Extended-A
        | '\u{FB50}'..='\u{FDFF}' // Arabic Presentation Forms-A
        | '\u{FE70}'..='\u{FEFF}' // Arabic Presentation Forms-B
    )
}

/// Proportion of right-to-left letters among all letters, in [0,1].
pub fn rtl_ratio(text: &str) -> f32 {
    let mut letters = 0u32;
    let mut rtl = 0u32;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            letters += 1;
            if is_rtl(ch) {
                rtl += 1;
            }
        }
    }
    if letters == 0 {
        0.0
    } else {
        rtl as f32 / letters as f32
    }
}

pub fn detect_language(text: &str) -> LanguageTag {
    let ratio = rtl_ratio(text);
    if ratio >= 0.7 {
        LanguageTag::Ar
    } else if ratio <= 0.15 {
        LanguageTag::En
    } else {
        LanguageTag::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_reports_byte_offsets() {
        let toks = tokenize("alpha  bravo\ncharlie");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[0].text, "alpha");
        assert_eq!((toks[0].start, toks[0].end), (0, 5));
        assert_eq!(toks[1].text, "bravo");
        assert_eq!((toks[1].start, toks[1].end), (7, 12));
        assert_eq!(toks[2].text, "charlie");
        assert_eq!(toks[2].end, 20);
    }

    #[test]
    fn sentences_tile_the_input() {
        let text = "First one. Second two! Third?  Tail without terminal";
        let spans = sentence_spans(text);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans.last().unwrap().end, text.len());
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "no gap between sentences");
        }
    }

    #[test]
    fn paragraphs_keep_separators() {
        let text = "para one line\n\npara two\n\n\npara three";
        let spans = paragraph_spans(text);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans.last().unwrap().end, text.len());
        let rebuilt: String = spans.iter().map(|s| &text[s.start..s.end]).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn trailing_blank_lines_attach_to_last_paragraph() {
        let text = "only paragraph\n\n\n";
        let spans = paragraph_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, text.len());
    }

    #[test]
    fn language_detection() {
        assert_eq!(detect_language("plain english text"), LanguageTag::En);
        assert_eq!(detect_language("مرحبا بالعالم هذا نص عربي"), LanguageTag::Ar);
        assert_eq!(
            detect_language("hello world مرحبا بالعالم hello مرحبا"),
            LanguageTag::Mixed
        );
    }

    #[test]
    fn rtl_ratio_ignores_digits_and_punctuation() {
        assert_eq!(rtl_ratio("123 456 ..."), 0.0);
    }

    #[test]
    fn row_spans_tile_table_text() {
        let text = "a | b | c\n1 | 2 | 3\n4 | 5 | 6";
        let rows = row_spans(text);
        assert_eq!(rows.len(), 3);
        let rebuilt: String = rows.iter().map(|s| &text[s.start..s.end]).collect();
        assert_eq!(rebuilt, text);
    }
}
