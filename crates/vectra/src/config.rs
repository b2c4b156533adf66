//! Configuration handling for vectra.
//!
//! Loaded from a TOML file (default `~/.config/vectra/config.toml`); every
//! field has a default so an absent or partial file works.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use vectra_extract::SizeLimits;
use vectra_pipeline::PipelineConfig;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Ingestion limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Collaborator deadlines
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedding-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_model() -> String {
    "hash-blake3".to_string()
}

fn default_dimension() -> usize {
    512
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            dimension: default_dimension(),
        }
    }
}

/// Search-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Similarity threshold used when a request does not specify one
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,

    /// Result cap used when a request does not specify one
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
}

fn default_threshold() -> f32 {
    0.7
}

fn default_max_results() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            default_max_results: default_max_results(),
        }
    }
}

/// Ingestion size ceilings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum file size for documents and tabular data (bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum file size for images (bytes)
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
}

fn default_max_file_size() -> u64 {
    52_428_800 // 50MB
}

fn default_max_image_size() -> u64 {
    10_485_760 // 10MB
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_image_size: default_max_image_size(),
        }
    }
}

/// Collaborator deadlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Embedder deadline (seconds)
    #[serde(default = "default_embed_secs")]
    pub embed_secs: u64,

    /// Store deadline (seconds)
    #[serde(default = "default_store_secs")]
    pub store_secs: u64,
}

fn default_embed_secs() -> u64 {
    30
}

fn default_store_secs() -> u64 {
    10
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            embed_secs: default_embed_secs(),
            store_secs: default_store_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from the default config path; missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load from an explicit path; `None` or a missing file means defaults.
    pub fn load_from(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Default config file path.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("VECTRA_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.toml"));
        }
        ProjectDirs::from("", "", "vectra").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Sample configuration file with every field at its default.
    #[must_use]
    pub fn sample_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Map onto the pipeline tunables.
    #[must_use]
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            dimension: self.embedding.dimension,
            default_threshold: self.search.default_threshold,
            default_max_results: self.search.default_max_results,
            embed_timeout: Duration::from_secs(self.timeouts.embed_secs),
            store_timeout: Duration::from_secs(self.timeouts.store_secs),
            size_limits: SizeLimits {
                default: self.limits.max_file_size,
                image: self.limits.max_image_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.embedding.dimension, 512);
        assert_eq!(config.search.default_threshold, 0.7);
        assert_eq!(config.search.default_max_results, 10);
        assert_eq!(config.limits.max_file_size, 52_428_800);
        assert_eq!(config.limits.max_image_size, 10_485_760);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[search]\ndefault_threshold = 0.5\n").unwrap();
        assert_eq!(config.search.default_threshold, 0.5);
        assert_eq!(config.search.default_max_results, 10);
        assert_eq!(config.embedding.dimension, 512);
    }

    #[test]
    fn test_sample_toml_roundtrips() {
        let sample = Config::sample_toml();
        let parsed: Config = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.embedding.dimension, 512);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.search.default_max_results, 10);
    }

    #[test]
    fn test_pipeline_config_mapping() {
        let mut config = Config::default();
        config.limits.max_file_size = 1024;
        config.timeouts.embed_secs = 5;
        let pc = config.pipeline_config();
        assert_eq!(pc.size_limits.default, 1024);
        assert_eq!(pc.embed_timeout, Duration::from_secs(5));
    }
}
