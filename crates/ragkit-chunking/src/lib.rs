//! ragkit-chunking
//!
//! Document complexity classification and boundary-preserving chunking.
//! The classifier scores a document and recommends fixed or dynamic
//! chunking; the chunkers turn text into ordered, provenance-tracked
//! chunks; the validator enforces shared invariants before the chunks
//! are handed to storage collaborators.

pub mod classifier;
pub mod dynamic;
pub mod fixed;
pub mod pipeline;
pub mod segment;
pub mod text;
pub mod validator;

pub use classifier::classify;
pub use dynamic::DynamicChunker;
pub use fixed::FixedChunker;
pub use pipeline::{DocumentPipeline, ProcessedDocument};
pub use validator::{ChunkValidator, RejectReason, ValidationSummary};
