//! Deterministic hash-based embedder.
//!
//! Stands in for a real multimodal model in tests, demos and offline runs.
//! Vectors are derived from a blake3 XOF over `(modality, payload)`, so the
//! same content always embeds to the same vector while different content
//! lands far apart. Output is deliberately *not* unit-norm; like a real
//! model's logits it must pass through the normalizer.

use async_trait::async_trait;
use tracing::debug;
use vectra_core::{EmbedError, Embedder, Modality, Payload};

/// Default embedding dimension, matching common multimodal models.
pub const DEFAULT_DIMENSION: usize = 512;

const SUPPORTED: &[Modality] = &[Modality::Text, Modality::Image];

/// Deterministic embedder backed by a blake3 XOF.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "hash-blake3"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn modalities(&self) -> &[Modality] {
        SUPPORTED
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn embed(&self, payload: &Payload) -> Result<Vec<f32>, EmbedError> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(payload.modality().to_string().as_bytes());
        hasher.update(&[0]);
        hasher.update(payload.as_str().as_bytes());

        let mut reader = hasher.finalize_xof();
        let mut buf = [0u8; 4];
        let mut values = Vec::with_capacity(self.dimension);
        for _ in 0..self.dimension {
            reader.fill(&mut buf);
            let word = u32::from_le_bytes(buf);
            // map onto [-1.0, 1.0]
            values.push((f64::from(word) / f64::from(u32::MAX) * 2.0 - 1.0) as f32);
        }

        debug!(
            modality = %payload.modality(),
            dimension = self.dimension,
            "generated hash embedding"
        );
        Ok(values)
    }
}
