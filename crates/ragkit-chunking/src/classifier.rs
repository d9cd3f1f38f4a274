//! Document complexity classification.
//!
//! A pure scoring function: raw features go into a `ComplexityProfile`,
//! named sub-scores normalize them into [0,1], and a weighted composite
//! is thresholded into tiers. Thresholds live here as constants so they
//! can be tuned without touching segmentation logic.

use ragkit_core::types::{
    ChunkStrategy, ChunkingDecision, ComplexityProfile, ComplexityTier, DecisionFactors,
    StructuralHints,
};

use crate::text::{count_tokens, paragraph_spans, rtl_ratio, sentence_spans};

/// Composite score below this recommends fixed chunking.
const LOWER_THRESHOLD: f32 = 0.25;
/// Composite score at or above this is complex.
const UPPER_THRESHOLD: f32 = 0.55;
/// Tables per page beyond this force the tabular tier.
const TABLE_RATIO_CUTOFF: f32 = 0.5;

/// Headings+tables per page that saturate the structural sub-score.
const STRUCTURE_PER_PAGE_SCALE: f32 = 8.0;
/// Corpus baseline for mean sentence length, in tokens.
const BASELINE_SENTENCE_TOKENS: f32 = 18.0;
/// Characters assumed per page when no page hints exist.
const CHARS_PER_PAGE: usize = 1800;

const WEIGHT_STRUCTURAL: f32 = 0.5;
const WEIGHT_LEXICAL: f32 = 0.25;
const WEIGHT_LAYOUT: f32 = 0.25;

/// Compute the raw feature profile for one document. When hints are
/// absent, pages are estimated from text length and headings from
/// markdown-style lines; tables cannot be detected from plain text.
pub fn build_profile(text: &str, hints: Option<&StructuralHints>) -> ComplexityProfile {
    let total_tokens = count_tokens(text);
    let sentences = sentence_spans(text);
    let avg_sentence_tokens = if sentences.is_empty() {
        0.0
    } else {
        total_tokens as f32 / sentences.len() as f32
    };

    let paragraphs = paragraph_spans(text);
    let lengths: Vec<f32> = paragraphs
        .iter()
        .map(|s| count_tokens(&text[s.start..s.end]) as f32)
        .collect();
    let mean = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<f32>() / lengths.len() as f32
    };
    let variance = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().map(|l| (l - mean) * (l - mean)).sum::<f32>() / lengths.len() as f32
    };

    let (page_count, heading_count, table_count) = match hints {
        Some(h) => (h.page_count(), h.headings.len(), h.tables.len()),
        None => (estimate_pages(text), detect_headings(text), 0),
    };

    ComplexityProfile {
        page_count,
        heading_count,
        table_count,
        avg_sentence_tokens,
        paragraph_token_mean: mean,
        paragraph_token_variance: variance,
        rtl_ratio: rtl_ratio(text),
    }
}

fn estimate_pages(text: &str) -> usize {
    (text.len() / CHARS_PER_PAGE).max(1)
}

fn detect_headings(text: &str) -> usize {
    text.lines()
        .filter(|line| {
            let line = line.trim_start();
            let hashes = line.chars().take_while(|&c| c == '#').count();
            (1..=6).contains(&hashes) && line[hashes..].starts_with(' ')
        })
        .count()
}

/// Headings and tables per page, saturating at `STRUCTURE_PER_PAGE_SCALE`.
/// Monotonic: more structure per page never lowers the score.
pub fn structural_density(profile: &ComplexityProfile) -> f32 {
    let per_page =
        (profile.heading_count + profile.table_count) as f32 / profile.page_count.max(1) as f32;
    (per_page / STRUCTURE_PER_PAGE_SCALE).clamp(0.0, 1.0)
}

/// Mean sentence length relative to the corpus baseline.
pub fn lexical_density(profile: &ComplexityProfile) -> f32 {
    (profile.avg_sentence_tokens / (2.0 * BASELINE_SENTENCE_TOKENS)).clamp(0.0, 1.0)
}

/// Coefficient of variation of paragraph lengths.
pub fn layout_irregularity(profile: &ComplexityProfile) -> f32 {
    if profile.paragraph_token_mean <= 0.0 {
        return 0.0;
    }
    let cv = profile.paragraph_token_variance.sqrt() / profile.paragraph_token_mean;
    (cv / 2.0).clamp(0.0, 1.0)
}

pub fn composite_score(profile: &ComplexityProfile) -> f32 {
    WEIGHT_STRUCTURAL * structural_density(profile)
        + WEIGHT_LEXICAL * lexical_density(profile)
        + WEIGHT_LAYOUT * layout_irregularity(profile)
}

/// Tier the profile and derive a strategy. Ambiguous composites (between
/// thresholds) resolve to dynamic: dynamic chunking never loses semantic
/// boundaries, while a wrong fixed choice cannot avoid boundary loss.
pub fn decide(profile: &ComplexityProfile, hints_available: bool) -> ChunkingDecision {
    let factors = DecisionFactors {
        structural_density: structural_density(profile),
        lexical_density: lexical_density(profile),
        layout_irregularity: layout_irregularity(profile),
        composite: composite_score(profile),
    };
    let composite = factors.composite;
    let table_ratio = profile.table_count as f32 / profile.page_count.max(1) as f32;

    let (tier, strategy) = if table_ratio > TABLE_RATIO_CUTOFF {
        (ComplexityTier::Tabular, ChunkStrategy::Dynamic)
    } else if composite >= UPPER_THRESHOLD {
        (ComplexityTier::Complex, ChunkStrategy::Dynamic)
    } else if composite < LOWER_THRESHOLD {
        (ComplexityTier::Simple, ChunkStrategy::Fixed)
    } else {
        (ComplexityTier::Moderate, ChunkStrategy::Dynamic)
    };

    let distance = (composite - LOWER_THRESHOLD)
        .abs()
        .min((composite - UPPER_THRESHOLD).abs());
    let mut confidence = (distance / (UPPER_THRESHOLD - LOWER_THRESHOLD)).clamp(0.0, 1.0);
    if tier == ComplexityTier::Tabular {
        let margin = ((table_ratio - TABLE_RATIO_CUTOFF) / TABLE_RATIO_CUTOFF).clamp(0.0, 1.0);
        confidence = confidence.max(margin);
    }
    if !hints_available {
        confidence *= 0.5;
    }

    ChunkingDecision {
        strategy,
        tier,
        confidence,
        factors,
        hints_available,
    }
}

/// Classify a document. Empty input is not an error: it yields the
/// lowest tier with zero confidence.
pub fn classify(text: &str, hints: Option<&StructuralHints>) -> ChunkingDecision {
    if text.trim().is_empty() {
        return ChunkingDecision {
            strategy: ChunkStrategy::Fixed,
            tier: ComplexityTier::Simple,
            confidence: 0.0,
            factors: DecisionFactors {
                structural_density: 0.0,
                lexical_density: 0.0,
                layout_irregularity: 0.0,
                composite: 0.0,
            },
            hints_available: hints.is_some(),
        };
    }
    let profile = build_profile(text, hints);
    decide(&profile, hints.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragkit_core::types::Span;

    fn profile(pages: usize, headings: usize, tables: usize) -> ComplexityProfile {
        ComplexityProfile {
            page_count: pages,
            heading_count: headings,
            table_count: tables,
            avg_sentence_tokens: 15.0,
            paragraph_token_mean: 60.0,
            paragraph_token_variance: 100.0,
            rtl_ratio: 0.0,
        }
    }

    #[test]
    fn empty_document_is_simple_with_zero_confidence() {
        let decision = classify("", None);
        assert_eq!(decision.tier, ComplexityTier::Simple);
        assert_eq!(decision.strategy, ChunkStrategy::Fixed);
        assert_eq!(decision.confidence, 0.0);
    }

    #[test]
    fn plain_prose_recommends_fixed() {
        let text = "A short plain note. It has two small sentences.";
        let decision = classify(text, Some(&StructuralHints::default()));
        assert_eq!(decision.strategy, ChunkStrategy::Fixed);
        assert_eq!(decision.tier, ComplexityTier::Simple);
    }

    #[test]
    fn heavily_structured_document_recommends_dynamic() {
        let hints = StructuralHints {
            headings: (0..12).map(|i| Span::new(i * 10, i * 10 + 5)).collect(),
            tables: vec![Span::new(200, 260), Span::new(300, 380)],
            page_breaks: vec![],
        };
        let text = "x ".repeat(250);
        let decision = classify(&text, Some(&hints));
        assert_eq!(decision.strategy, ChunkStrategy::Dynamic);
        assert!(matches!(
            decision.tier,
            ComplexityTier::Complex | ComplexityTier::Tabular
        ));
    }

    #[test]
    fn table_ratio_cutoff_forces_tabular() {
        let decision = decide(&profile(2, 0, 3), true);
        assert_eq!(decision.tier, ComplexityTier::Tabular);
        assert_eq!(decision.strategy, ChunkStrategy::Dynamic);
    }

    #[test]
    fn structural_density_is_monotonic_in_structure() {
        let mut prev = -1.0f32;
        for headings in 0..30 {
            let score = structural_density(&profile(3, headings, 2));
            assert!(
                score >= prev,
                "adding headings must never lower the score"
            );
            prev = score;
        }
        let mut prev = -1.0f32;
        for tables in 0..30 {
            let score = structural_density(&profile(3, 4, tables));
            assert!(score >= prev);
            prev = score;
        }
    }

    #[test]
    fn composite_is_monotonic_in_structure() {
        let low = composite_score(&profile(3, 1, 0));
        let high = composite_score(&profile(3, 9, 3));
        assert!(high > low);
    }

    #[test]
    fn missing_hints_reduce_confidence() {
        let text = "Plain text without any markup. Just prose sentences here.";
        let with = classify(text, Some(&StructuralHints::default()));
        let without = classify(text, None);
        assert!(!without.hints_available);
        assert!(without.confidence <= with.confidence);
    }

    #[test]
    fn sub_scores_stay_in_unit_interval() {
        let p = profile(1, 1000, 1000);
        for score in [
            structural_density(&p),
            lexical_density(&p),
            layout_irregularity(&p),
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn ambiguous_composite_resolves_to_dynamic() {
        // craft a profile landing between the thresholds
        let p = ComplexityProfile {
            page_count: 2,
            heading_count: 5,
            table_count: 0,
            avg_sentence_tokens: 12.0,
            paragraph_token_mean: 40.0,
            paragraph_token_variance: 400.0,
            rtl_ratio: 0.0,
        };
        let composite = composite_score(&p);
        assert!(
            composite >= 0.25 && composite < 0.55,
            "test premise: composite {composite} falls between thresholds"
        );
        let decision = decide(&p, true);
        assert_eq!(decision.tier, ComplexityTier::Moderate);
        assert_eq!(decision.strategy, ChunkStrategy::Dynamic);
    }
}
