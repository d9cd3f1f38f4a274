//! Hybrid retrieval over the semantic and keyword search collaborators.

use tracing::warn;

use ragkit_core::config::RetrievalConfig;
use ragkit_core::error::{Error, Result};
use ragkit_core::traits::{KeywordSearcher, SemanticSearcher};
use ragkit_core::types::{FusedResult, RetrievalCandidate, SignalKind};

use crate::fusion::{normalize_scores, reciprocal_rank_fusion};

/// Result of one retrieval call. `partial` is set when a signal was
/// unavailable and fusion ran over the remaining one.
#[derive(Debug, Clone)]
pub struct RetrievalOutcome {
    pub results: Vec<FusedResult>,
    pub partial: bool,
    pub unavailable: Option<SignalKind>,
}

pub struct HybridRetriever<S, K>
where
    S: SemanticSearcher,
    K: KeywordSearcher,
{
    semantic: S,
    keyword: K,
    config: RetrievalConfig,
}

impl<S, K> HybridRetriever<S, K>
where
    S: SemanticSearcher,
    K: KeywordSearcher,
{
    pub fn new(semantic: S, keyword: K, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            semantic,
            keyword,
            config,
        })
    }

    /// Collect both candidate lists, then fuse. Both signals are fully
    /// collected before fusion begins; fusion is never incremental.
    ///
    /// One unavailable signal degrades to a partially-fused result; if
    /// both are down this is an error, since an empty answer would be
    /// indistinguishable from a confident "nothing matches".
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievalOutcome> {
        if top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".to_string()));
        }
        // ask each signal for more than top_k so fusion is not starved
        // when the signals disagree
        let fetch = ((top_k as f32) * self.config.overshoot_factor).ceil() as usize;
        let fetch = fetch.max(top_k);

        let semantic = self.semantic.semantic_search(query, fetch);
        let keyword = self.keyword.keyword_search(query, fetch);

        let (semantic, keyword, unavailable) = match (semantic, keyword) {
            (Err(sem_err), Err(kw_err)) => {
                return Err(Error::Retrieval(format!(
                    "both signals unavailable (semantic: {sem_err}; keyword: {kw_err})"
                )));
            }
            (Ok(s), Ok(k)) => (s, k, None),
            (Ok(s), Err(kw_err)) => {
                warn!(
                    "{} signal unavailable, fusing {} only: {kw_err}",
                    SignalKind::Keyword,
                    SignalKind::Semantic
                );
                (s, Vec::new(), Some(SignalKind::Keyword))
            }
            (Err(sem_err), Ok(k)) => {
                warn!(
                    "{} signal unavailable, fusing {} only: {sem_err}",
                    SignalKind::Semantic,
                    SignalKind::Keyword
                );
                (Vec::new(), k, Some(SignalKind::Semantic))
            }
        };

        let mut semantic = semantic;
        let mut keyword = keyword;
        normalize_scores(&mut semantic);
        normalize_scores(&mut keyword);

        let results = reciprocal_rank_fusion(&semantic, &keyword, self.config.rrf_k, top_k);
        Ok(RetrievalOutcome {
            results,
            partial: unavailable.is_some(),
            unavailable,
        })
    }

    /// Retrieve with the configured default `top_k`.
    pub fn retrieve_default(&self, query: &str) -> Result<RetrievalOutcome> {
        self.retrieve(query, self.config.top_k)
    }
}
