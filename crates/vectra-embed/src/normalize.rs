//! Vector normalization.
//!
//! Every raw embedder output passes through [`normalize`] before storage or
//! comparison. The function is the only blessed producer of
//! [`EmbeddingVector`] outside of tests: it enforces the fixed dimension,
//! finiteness of every component and the unit L2 norm that makes dot product
//! equal cosine similarity downstream.

use vectra_core::{EmbeddingVector, VectorError};

/// Normalize a raw vector to unit L2 norm.
///
/// Rejects rather than coerces: a wrong dimension, a NaN or infinite
/// component, or an all-zero vector each fail with the corresponding
/// [`VectorError`]. The norm is accumulated in f64 so that high-dimensional
/// vectors of small components do not lose precision in the sum of squares.
///
/// Normalizing an already-normalized vector changes no component by more
/// than 1e-6.
pub fn normalize(raw: &[f32], expected_dimension: usize) -> Result<EmbeddingVector, VectorError> {
    if raw.len() != expected_dimension {
        return Err(VectorError::DimensionMismatch {
            expected: expected_dimension,
            actual: raw.len(),
        });
    }

    for (index, value) in raw.iter().enumerate() {
        if !value.is_finite() {
            return Err(VectorError::NonFinite { index });
        }
    }

    let norm_sq: f64 = raw.iter().map(|&v| f64::from(v) * f64::from(v)).sum();
    if norm_sq == 0.0 {
        return Err(VectorError::Degenerate);
    }
    let norm = norm_sq.sqrt();

    let values = raw
        .iter()
        .map(|&v| (f64::from(v) / norm) as f32)
        .collect();

    Ok(EmbeddingVector::from_normalized(values))
}
