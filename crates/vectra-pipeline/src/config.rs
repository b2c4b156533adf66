//! Pipeline configuration.

use std::time::Duration;

use vectra_extract::SizeLimits;

/// Tunables for the [`Pipeline`](crate::Pipeline).
///
/// `default_threshold` and `default_max_results` only apply when a search
/// request leaves them unset; the ranker itself never defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Expected embedding dimension; must match the injected embedder
    pub dimension: usize,
    /// Similarity threshold used when a search does not specify one
    pub default_threshold: f32,
    /// Result cap used when a search does not specify one
    pub default_max_results: usize,
    /// Deadline for a single embedder call
    pub embed_timeout: Duration,
    /// Deadline for a single store call
    pub store_timeout: Duration,
    /// Size ceilings for file ingestion
    pub size_limits: SizeLimits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dimension: 512,
            default_threshold: 0.7,
            default_max_results: 10,
            embed_timeout: Duration::from_secs(30),
            store_timeout: Duration::from_secs(10),
            size_limits: SizeLimits::default(),
        }
    }
}
