//! Domain types shared by the chunking and retrieval crates.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Half-open byte range `[start, end)` into the source document text.
///
/// Offsets always fall on UTF-8 character boundaries of the text they
/// were produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Language of a chunk's text, derived from its script ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    En,
    Ar,
    Mixed,
}

/// Structural role of a chunk within its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralRole {
    Body,
    Heading,
    Table,
}

/// A chunk of a source document that is independently indexed.
///
/// - `id`: globally unique chunk identifier (`{doc_id}:{ordinal}`)
/// - `doc_id`: stable document identity (file stem or external id)
/// - `ordinal`: position within the parent document, strictly increasing
/// - `content`: the text payload of the chunk
/// - `token_count`: whitespace-token count of `content`
/// - `span`: provenance range in the source text; sibling spans never
///   overlap except within the fixed chunker's bounded overlap window
/// - `below_min_tokens`: set when a dynamic chunk could not be merged up
///   to the minimum size without overflowing the maximum; such chunks are
///   kept rather than discarded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub ordinal: usize,
    pub content: String,
    pub token_count: usize,
    pub language: LanguageTag,
    pub role: Option<StructuralRole>,
    pub span: Span,
    pub below_min_tokens: bool,
}

/// Structural hints supplied by the ingestion collaborator alongside the
/// extracted text. All spans are byte offsets into that text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuralHints {
    pub headings: Vec<Span>,
    pub tables: Vec<Span>,
    /// Byte offsets where a new page begins. Empty means single page.
    pub page_breaks: Vec<usize>,
}

impl StructuralHints {
    pub fn page_count(&self) -> usize {
        self.page_breaks.len() + 1
    }
}

/// Raw structural/textual features of one document, computed once and
/// consumed only by the classifier's decision function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityProfile {
    pub page_count: usize,
    pub heading_count: usize,
    pub table_count: usize,
    /// Mean whitespace tokens per sentence.
    pub avg_sentence_tokens: f32,
    /// Mean and variance of paragraph lengths in tokens.
    pub paragraph_token_mean: f32,
    pub paragraph_token_variance: f32,
    /// Proportion of right-to-left letters among all letters, in [0,1].
    pub rtl_ratio: f32,
}

/// Chunking strategy recommended by the classifier or forced by config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    Fixed,
    Dynamic,
}

/// Complexity tier a document's composite score landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Simple,
    Moderate,
    Tabular,
    Complex,
}

/// Named sub-scores contributing to a chunking decision, each in [0,1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionFactors {
    pub structural_density: f32,
    pub lexical_density: f32,
    pub layout_irregularity: f32,
    pub composite: f32,
}

/// Output of the complexity classifier. Not persisted beyond the
/// indexing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingDecision {
    pub strategy: ChunkStrategy,
    pub tier: ComplexityTier,
    /// Normalized distance from the nearest tier threshold, in [0,1].
    /// Halved when structural hints were unavailable.
    pub confidence: f32,
    pub factors: DecisionFactors,
    pub hints_available: bool,
}

/// Which retrieval signal produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Semantic,
    Keyword,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Semantic => write!(f, "semantic"),
            SignalKind::Keyword => write!(f, "keyword"),
        }
    }
}

/// One hit from a single signal. Ephemeral, produced per query.
///
/// `raw_score` is engine-specific but higher is always better.
/// `normalized_score` is min-max rescaled within its own signal list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub id: ChunkId,
    pub signal: SignalKind,
    pub raw_score: f32,
    pub normalized_score: f32,
}

/// Raw per-signal scores retained through fusion for tie-breaking and
/// diagnostics. `None` means the chunk did not appear in that signal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ContributingSignals {
    pub semantic_raw: Option<f32>,
    pub keyword_raw: Option<f32>,
}

/// A candidate after reciprocal rank fusion, consumed by the reranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: ChunkId,
    pub fused_score: f32,
    /// 1-based rank after fusion.
    pub rank: usize,
    pub signals: ContributingSignals,
}

/// Final scored ordering returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: ChunkId,
    pub score: f32,
    /// 1-based final rank.
    pub rank: usize,
}
