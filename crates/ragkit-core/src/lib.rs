//! Shared domain types, configuration and collaborator traits for the
//! ragkit chunking and retrieval pipeline.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars. The typed `ChunkingConfig`/`RetrievalConfig` sections are validated
//! eagerly so bad bounds fail at setup, never per chunk.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
