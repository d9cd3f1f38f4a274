//! Per-document chunking pipeline: classify, chunk, validate.
//!
//! Runs to completion for one document before anything is handed to
//! storage collaborators; there is no partial chunk emission. All state
//! is request-local, so independent callers can process documents
//! concurrently without coordination.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use ragkit_core::config::ChunkingConfig;
use ragkit_core::types::{Chunk, ChunkId, ChunkStrategy, ChunkingDecision, StructuralHints};

use crate::classifier::classify;
use crate::dynamic::DynamicChunker;
use crate::fixed::FixedChunker;
use crate::validator::{ChunkValidator, RejectReason};

pub struct ProcessedDocument {
    pub doc_id: String,
    pub decision: ChunkingDecision,
    pub chunks: Vec<Chunk>,
    pub rejected: Vec<(Chunk, RejectReason)>,
}

pub struct DocumentPipeline {
    config: ChunkingConfig,
    fixed: FixedChunker,
    dynamic: DynamicChunker,
    validator: ChunkValidator,
}

impl DocumentPipeline {
    /// Configuration is validated here, before any document is touched.
    pub fn new(config: ChunkingConfig) -> ragkit_core::error::Result<Self> {
        config.validate()?;
        let fixed = FixedChunker::new(&config)?;
        let dynamic = DynamicChunker::new(&config)?;
        let validator = ChunkValidator::from_config(&config);
        Ok(Self {
            config,
            fixed,
            dynamic,
            validator,
        })
    }

    pub fn process_text(
        &self,
        doc_id: &str,
        text: &str,
        hints: Option<&StructuralHints>,
    ) -> ProcessedDocument {
        let decision = match self.config.strategy_override {
            Some(strategy) => {
                let mut decision = classify(text, hints);
                decision.strategy = strategy;
                decision.confidence = 1.0;
                decision
            }
            None => classify(text, hints),
        };

        let default_hints = StructuralHints::default();
        let hints = hints.unwrap_or(&default_hints);
        let chunks = match decision.strategy {
            ChunkStrategy::Fixed => self.fixed.chunk(doc_id, text),
            ChunkStrategy::Dynamic => self.dynamic.chunk(doc_id, text, hints),
        };
        let (chunks, rejected) = self.validator.validate(chunks);

        info!(
            doc_id,
            strategy = ?decision.strategy,
            accepted = chunks.len(),
            rejected = rejected.len(),
            "document chunked"
        );
        ProcessedDocument {
            doc_id: doc_id.to_string(),
            decision,
            chunks,
            rejected,
        }
    }

    /// Chunk every `.txt` file under `data_dir`, in sorted path order.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<ProcessedDocument>> {
        let files = list_txt_files(data_dir);
        if files.is_empty() {
            info!("no .txt files found under {}", data_dir.display());
            return Ok(Vec::new());
        }
        self.process_files(&files)
    }

    /// Same as `process_directory` but only the first `limit` files.
    pub fn process_directory_limited(
        &self,
        data_dir: &Path,
        limit: usize,
    ) -> Result<Vec<ProcessedDocument>> {
        let mut files = list_txt_files(data_dir);
        if files.len() > limit {
            files.truncate(limit);
            debug!("limited to first {limit} files");
        }
        self.process_files(&files)
    }

    pub fn process_files(&self, files: &[PathBuf]) -> Result<Vec<ProcessedDocument>> {
        let mut documents = Vec::with_capacity(files.len());
        for (index, path) in files.iter().enumerate() {
            debug!(
                "processing file {}/{}: {}",
                index + 1,
                files.len(),
                path.display()
            );
            let content = read_file_content(path)?;
            let doc_id = extract_doc_id(path);
            documents.push(self.process_text(&doc_id, &content, None));
        }
        info!("processed {} files", documents.len());
        Ok(documents)
    }
}

/// Complete identifier set for one document's chunks, so the caller can
/// cascade deletes without creating orphans.
pub fn chunk_ids_for_document(chunks: &[Chunk], doc_id: &str) -> Vec<ChunkId> {
    chunks
        .iter()
        .filter(|c| c.doc_id == doc_id)
        .map(|c| c.id.clone())
        .collect()
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

fn extract_doc_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// All `.txt` files under `root`, sorted by path. Callers that need a
/// per-file progress display walk this list and feed `process_files`.
pub fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}
