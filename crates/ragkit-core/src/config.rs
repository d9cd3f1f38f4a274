use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ChunkStrategy;

/// Chunking bounds supplied by the indexing orchestrator.
///
/// Invalid bounds are a configuration error reported by `validate`
/// before any chunk is produced, never per chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size for fixed chunking, in tokens.
    pub target_token_size: usize,
    /// Tokens shared between consecutive fixed windows.
    pub overlap_tokens: usize,
    /// Lower bound for any emitted chunk, in tokens.
    pub min_tokens: usize,
    /// Upper bound for any emitted chunk, in tokens.
    pub max_tokens: usize,
    /// Force a strategy instead of consulting the classifier.
    pub strategy_override: Option<ChunkStrategy>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_token_size: 512,
            overlap_tokens: 50,
            min_tokens: 50,
            max_tokens: 2000,
            strategy_override: None,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_token_size == 0 {
            return Err(Error::InvalidConfig(
                "target_token_size must be positive".to_string(),
            ));
        }
        if self.overlap_tokens >= self.target_token_size {
            return Err(Error::InvalidConfig(format!(
                "overlap_tokens ({}) must be strictly less than target_token_size ({})",
                self.overlap_tokens, self.target_token_size
            )));
        }
        if self.min_tokens == 0 {
            return Err(Error::InvalidConfig(
                "min_tokens must be positive".to_string(),
            ));
        }
        if self.min_tokens > self.max_tokens {
            return Err(Error::InvalidConfig(format!(
                "min_tokens ({}) must not exceed max_tokens ({})",
                self.min_tokens, self.max_tokens
            )));
        }
        if self.target_token_size > self.max_tokens {
            return Err(Error::InvalidConfig(format!(
                "target_token_size ({}) must not exceed max_tokens ({})",
                self.target_token_size, self.max_tokens
            )));
        }
        Ok(())
    }
}

/// Query-time tuning for hybrid retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Results returned when the caller does not say otherwise.
    pub top_k: usize,
    /// Smoothing constant for reciprocal rank fusion.
    pub rrf_k: f32,
    /// Each signal is asked for `top_k * overshoot_factor` candidates so
    /// fusion quality does not starve when the signals disagree.
    pub overshoot_factor: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            rrf_k: 60.0,
            overshoot_factor: 2.0,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".to_string()));
        }
        if self.rrf_k <= 0.0 {
            return Err(Error::InvalidConfig("rrf_k must be positive".to_string()));
        }
        if self.overshoot_factor < 1.0 {
            return Err(Error::InvalidConfig(
                "overshoot_factor must be at least 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the `[chunking]` section, falling back to
    /// defaults when absent.
    pub fn chunking(&self) -> anyhow::Result<ChunkingConfig> {
        let cfg: ChunkingConfig = self.figment.extract_inner("chunking").unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Extract and validate the `[retrieval]` section, falling back to
    /// defaults when absent.
    pub fn retrieval(&self) -> anyhow::Result<RetrievalConfig> {
        let cfg: RetrievalConfig = self.figment.extract_inner("retrieval").unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
