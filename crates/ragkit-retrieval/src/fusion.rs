//! Reciprocal rank fusion.
//!
//! Each candidate's fused score is the sum of `1 / (k + rank)` over
//! every signal it appears in, with 1-based ranks. A candidate present
//! in both signals accumulates both terms, which is the intended bias
//! toward corroborated relevance. Ties break by raw semantic score,
//! then lexicographically smaller chunk id, for full determinism.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use ragkit_core::types::{ContributingSignals, FusedResult, RetrievalCandidate, SignalKind};

#[derive(Default)]
struct Accumulator {
    score: f32,
    signals: ContributingSignals,
}

pub fn reciprocal_rank_fusion(
    semantic: &[RetrievalCandidate],
    keyword: &[RetrievalCandidate],
    rrf_k: f32,
    top_k: usize,
) -> Vec<FusedResult> {
    let mut by_id: HashMap<String, Accumulator> = HashMap::new();

    for (rank, candidate) in ranked(semantic) {
        let acc = by_id.entry(candidate.id.clone()).or_default();
        acc.score += 1.0 / (rrf_k + rank as f32);
        acc.signals.semantic_raw = Some(candidate.raw_score);
    }
    for (rank, candidate) in ranked(keyword) {
        let acc = by_id.entry(candidate.id.clone()).or_default();
        acc.score += 1.0 / (rrf_k + rank as f32);
        acc.signals.keyword_raw = Some(candidate.raw_score);
    }

    let mut fused: Vec<FusedResult> = by_id
        .into_iter()
        .map(|(id, acc)| FusedResult {
            id,
            fused_score: acc.score,
            rank: 0,
            signals: acc.signals,
        })
        .collect();

    fused.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let a_sem = a.signals.semantic_raw.unwrap_or(f32::NEG_INFINITY);
                let b_sem = b.signals.semantic_raw.unwrap_or(f32::NEG_INFINITY);
                b_sem.partial_cmp(&a_sem).unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.id.cmp(&b.id))
    });
    fused.truncate(top_k);
    for (index, result) in fused.iter_mut().enumerate() {
        result.rank = index + 1;
    }
    fused
}

/// 1-based ranks over a candidate list, keeping only the first
/// occurrence of each id.
fn ranked(candidates: &[RetrievalCandidate]) -> impl Iterator<Item = (usize, &RetrievalCandidate)> {
    let mut seen: HashSet<&str> = HashSet::new();
    candidates
        .iter()
        .filter(move |c| seen.insert(c.id.as_str()))
        .enumerate()
        .map(|(i, c)| (i + 1, c))
}

/// Min-max rescale of raw scores within one signal list. A uniform
/// list maps to all-1.0.
pub fn normalize_scores(candidates: &mut [RetrievalCandidate]) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for c in candidates.iter() {
        min = min.min(c.raw_score);
        max = max.max(c.raw_score);
    }
    let range = max - min;
    for c in candidates.iter_mut() {
        c.normalized_score = if range > 0.0 {
            (c.raw_score - min) / range
        } else {
            1.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, signal: SignalKind, raw: f32) -> RetrievalCandidate {
        RetrievalCandidate {
            id: id.to_string(),
            signal,
            raw_score: raw,
            normalized_score: 0.0,
        }
    }

    fn semantic(ids: &[(&str, f32)]) -> Vec<RetrievalCandidate> {
        ids.iter()
            .map(|(id, raw)| candidate(id, SignalKind::Semantic, *raw))
            .collect()
    }

    fn keyword(ids: &[(&str, f32)]) -> Vec<RetrievalCandidate> {
        ids.iter()
            .map(|(id, raw)| candidate(id, SignalKind::Keyword, *raw))
            .collect()
    }

    #[test]
    fn corroborated_candidate_beats_single_signal_at_same_rank() {
        // x at rank 1 in both signals vs y at rank 1 in one signal
        let both = reciprocal_rank_fusion(
            &semantic(&[("x", 0.9)]),
            &keyword(&[("x", 11.0)]),
            60.0,
            10,
        );
        let single = reciprocal_rank_fusion(&semantic(&[("y", 0.9)]), &[], 60.0, 10);
        assert!(both[0].fused_score > single[0].fused_score);
    }

    #[test]
    fn abc_cad_scenario_ranks_c_above_b_and_d() {
        // semantic [A,B,C], keyword [C,A,D], k=60
        let fused = reciprocal_rank_fusion(
            &semantic(&[("A", 0.9), ("B", 0.8), ("C", 0.7)]),
            &keyword(&[("C", 9.0), ("A", 8.0), ("D", 7.0)]),
            60.0,
            10,
        );
        let rank_of = |id: &str| fused.iter().find(|f| f.id == id).unwrap().rank;
        assert!(rank_of("C") < rank_of("B"));
        assert!(rank_of("C") < rank_of("D"));
        // A appears at rank 1 and 2, C at 3 and 1: A edges out C
        assert_eq!(rank_of("A"), 1);
        assert_eq!(rank_of("C"), 2);
    }

    #[test]
    fn ties_break_by_semantic_raw_then_id() {
        // same single-signal rank in different signals: equal fused score
        let fused = reciprocal_rank_fusion(
            &semantic(&[("m", 0.5)]),
            &keyword(&[("n", 5.0)]),
            60.0,
            10,
        );
        assert_eq!(fused[0].id, "m", "semantic raw score wins the tie");

        // both keyword-only at equal fused score: lexicographic id
        let fused = reciprocal_rank_fusion(
            &[],
            &keyword(&[("z", 5.0)]),
            60.0,
            10,
        );
        assert_eq!(fused[0].id, "z");
        let a = reciprocal_rank_fusion(&semantic(&[("b", 0.5), ("a", 0.5)]), &[], 60.0, 10);
        // distinct ranks here, but equal raw scores: rank order holds
        assert_eq!(a[0].id, "b");
    }

    #[test]
    fn duplicate_ids_within_one_signal_count_once() {
        let fused = reciprocal_rank_fusion(
            &semantic(&[("x", 0.9), ("x", 0.8), ("y", 0.7)]),
            &[],
            60.0,
            10,
        );
        let x = fused.iter().find(|f| f.id == "x").unwrap();
        assert!((x.fused_score - 1.0 / 61.0).abs() < 1e-6);
        let y = fused.iter().find(|f| f.id == "y").unwrap();
        assert!((y.fused_score - 1.0 / 62.0).abs() < 1e-6, "y ranks second, not third");
    }

    #[test]
    fn top_k_truncates_after_ranking() {
        let fused = reciprocal_rank_fusion(
            &semantic(&[("a", 0.9), ("b", 0.8), ("c", 0.7)]),
            &keyword(&[("d", 3.0), ("e", 2.0)]),
            60.0,
            2,
        );
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].rank, 1);
        assert_eq!(fused[1].rank, 2);
    }

    #[test]
    fn normalize_scores_min_max() {
        let mut cands = semantic(&[("a", 2.0), ("b", 1.0), ("c", 0.0)]);
        normalize_scores(&mut cands);
        assert_eq!(cands[0].normalized_score, 1.0);
        assert_eq!(cands[1].normalized_score, 0.5);
        assert_eq!(cands[2].normalized_score, 0.0);

        let mut uniform = semantic(&[("a", 3.0), ("b", 3.0)]);
        normalize_scores(&mut uniform);
        assert!(uniform.iter().all(|c| c.normalized_score == 1.0));
    }
}
