//! Trait seams to the external collaborators.
//!
//! The pipeline consumes two capabilities it does not implement itself:
//!
//! - [`Embedder`]: maps `(content, modality)` to a raw vector
//! - [`ContentStore`]: persists `(id, modality, content, vector, metadata)`
//!   and surfaces similarity candidates for a query vector
//!
//! Both are object-safe so the orchestrator can hold them as
//! `Arc<dyn Embedder>` / `Arc<dyn ContentStore>`; implementations are
//! injected at construction, never reached through globals.

use async_trait::async_trait;

use crate::error::{EmbedError, StoreError};
use crate::types::{ContentItem, EmbeddingVector, Modality, Payload, SimilarityCandidate};

/// Capability for generating raw embedding vectors.
///
/// Contract: for a given modality, `embed` returns a vector of length
/// [`Embedder::dimension`] for every call within one process lifetime. The
/// output is *not* trusted to be unit-norm; every raw vector passes through
/// the normalizer before storage or comparison.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Embedding dimension, fixed for the life of the embedder.
    fn dimension(&self) -> usize;

    /// Supported modalities.
    fn modalities(&self) -> &[Modality];

    /// Whether the model is loaded and ready to serve.
    fn is_ready(&self) -> bool;

    /// Generate a raw embedding for the payload.
    async fn embed(&self, payload: &Payload) -> Result<Vec<f32>, EmbedError>;
}

/// Capability for storing vectors and surfacing similarity candidates.
///
/// `put` must be atomic per item: a call either fully commits one
/// `ContentItem` + `EmbeddingVector` pair or not at all. The store owns
/// visibility consistency between a just-stored vector and a concurrent
/// query; the pipeline does not assume synchronous visibility.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store (or replace) one item with its normalized vector.
    async fn put(&self, item: &ContentItem, vector: &EmbeddingVector) -> Result<(), StoreError>;

    /// Return candidates whose similarity to `vector` meets `threshold`
    /// (inclusive), optionally restricted to one modality.
    ///
    /// Candidates come back in a deterministic store order; descending
    /// ranking and the `max_results` cap are the ranker's authority, the
    /// store may treat `max_results` as a retrieval-breadth hint.
    async fn query(
        &self,
        vector: &EmbeddingVector,
        modality_filter: Option<Modality>,
        threshold: f32,
        max_results: usize,
    ) -> Result<Vec<SimilarityCandidate>, StoreError>;

    /// Number of stored items.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Whether the store is connected and ready.
    async fn is_ready(&self) -> bool;
}
