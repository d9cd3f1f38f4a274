//! Cross-encoder reranking with graceful pass-through.
//!
//! Reranking is a quality refinement, not a correctness requirement:
//! when the cross-encoder collaborator (or the text lookup feeding it)
//! is unavailable, the fused order is returned unchanged instead of
//! failing the retrieval.

use tracing::warn;

use ragkit_core::traits::{ChunkTextSource, CrossEncoder};
use ragkit_core::types::{ChunkId, FusedResult, RankedResult};

pub struct Reranker<E, T>
where
    E: CrossEncoder,
    T: ChunkTextSource,
{
    encoder: E,
    texts: T,
}

impl<E, T> Reranker<E, T>
where
    E: CrossEncoder,
    T: ChunkTextSource,
{
    pub fn new(encoder: E, texts: T) -> Self {
        Self { encoder, texts }
    }

    /// Score every fused candidate against the query and sort
    /// descending. Equal scores keep the incoming fused rank (stable
    /// sort over an already rank-ordered input).
    pub fn rerank(&self, query: &str, fused: &[FusedResult]) -> Vec<RankedResult> {
        if fused.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ChunkId> = fused.iter().map(|f| f.id.clone()).collect();
        let scored = self.texts.texts_for(&ids).and_then(|texts| {
            if texts.len() != ids.len() {
                anyhow::bail!(
                    "text source returned {} texts for {} ids",
                    texts.len(),
                    ids.len()
                );
            }
            self.encoder.score_batch(query, &texts)
        });

        match scored {
            Ok(scores) if scores.len() == fused.len() => {
                let mut order: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
                order.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
                });
                order
                    .into_iter()
                    .enumerate()
                    .map(|(rank, (index, score))| RankedResult {
                        id: fused[index].id.clone(),
                        score,
                        rank: rank + 1,
                    })
                    .collect()
            }
            Ok(scores) => {
                warn!(
                    "cross-encoder returned {} scores for {} candidates, passing fused order through",
                    scores.len(),
                    fused.len()
                );
                passthrough(fused)
            }
            Err(err) => {
                warn!("cross-encoder unavailable, passing fused order through: {err}");
                passthrough(fused)
            }
        }
    }
}

fn passthrough(fused: &[FusedResult]) -> Vec<RankedResult> {
    fused
        .iter()
        .enumerate()
        .map(|(index, f)| RankedResult {
            id: f.id.clone(),
            score: f.fused_score,
            rank: index + 1,
        })
        .collect()
}
