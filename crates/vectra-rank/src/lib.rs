//! # vectra-rank
//!
//! Similarity scoring and ranking.
//!
//! [`rank`] is a pure function from a query vector and a candidate set to an
//! ordered result list. All vectors entering here are unit-norm, so the dot
//! product *is* the cosine similarity; no renormalization happens at ranking
//! time.

use tracing::debug;
use vectra_core::{EmbeddingVector, Modality, RankedResult, SimilarityCandidate};

/// Rank candidates against a query vector.
///
/// Pipeline: optional modality filter, score every survivor, drop scores
/// below `threshold` (the threshold is inclusive, a candidate at exactly
/// `threshold` is kept), sort descending, cap at `max_results`.
///
/// The sort is stable, so candidates with equal similarity keep the order
/// the store returned them in. Both `threshold` and `max_results` are
/// required; defaulting is the caller's concern.
#[must_use]
pub fn rank(
    query: &EmbeddingVector,
    candidates: Vec<SimilarityCandidate>,
    modality_filter: Option<Modality>,
    threshold: f32,
    max_results: usize,
) -> Vec<RankedResult> {
    let candidate_count = candidates.len();

    let mut results: Vec<RankedResult> = candidates
        .into_iter()
        .filter(|c| modality_filter.map_or(true, |m| c.modality == m))
        .filter_map(|c| {
            let similarity = query.dot(&c.vector);
            if similarity >= threshold {
                Some(RankedResult {
                    content_id: c.content_id,
                    modality: c.modality,
                    content: c.content,
                    similarity,
                    metadata: c.metadata,
                })
            } else {
                None
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(max_results);

    debug!(
        candidates = candidate_count,
        returned = results.len(),
        threshold = %threshold,
        max_results,
        "ranked candidates"
    );
    results
}
