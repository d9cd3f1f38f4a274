//! ragkit-retrieval
//!
//! Query-time hybrid retrieval: reciprocal rank fusion over semantic
//! and keyword candidate lists, plus cross-encoder reranking. Fusion
//! and reranking are pure transformations over ordered sequences; the
//! collaborators behind the traits do all the I/O.

pub mod fusion;
pub mod rerank;
pub mod retriever;

pub use fusion::reciprocal_rank_fusion;
pub use rerank::Reranker;
pub use retriever::{HybridRetriever, RetrievalOutcome};
