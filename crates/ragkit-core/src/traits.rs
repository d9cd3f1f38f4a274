//! Collaborator interfaces. The stores and models behind these traits do
//! their own I/O and may block; the core only sequences the calls.

use crate::types::{ChunkId, RetrievalCandidate};

/// Vector store collaborator. The implementation owns query embedding;
/// the core passes the query text through untouched.
pub trait SemanticSearcher: Send + Sync {
    fn semantic_search(&self, query: &str, k: usize) -> anyhow::Result<Vec<RetrievalCandidate>>;
}

/// Keyword/metadata store collaborator (full-text search).
pub trait KeywordSearcher: Send + Sync {
    fn keyword_search(&self, query: &str, k: usize) -> anyhow::Result<Vec<RetrievalCandidate>>;
}

/// Cross-encoder collaborator: scalar relevance for (query, chunk_text)
/// pairs, scored in batch.
pub trait CrossEncoder: Send + Sync {
    fn score_batch(&self, query: &str, chunk_texts: &[String]) -> anyhow::Result<Vec<f32>>;
}

/// Chunk content lookup, backed by the metadata store. The reranker uses
/// it to resolve fused candidate ids to text before cross-encoding.
pub trait ChunkTextSource: Send + Sync {
    fn texts_for(&self, ids: &[ChunkId]) -> anyhow::Result<Vec<String>>;
}
