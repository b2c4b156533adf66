//! # vectra-embed
//!
//! Vector normalization and embedder implementations.
//!
//! The [`normalize`] function is the single gate between raw embedder output
//! and the rest of the pipeline: only vectors that pass its dimension,
//! finiteness and non-degeneracy checks become
//! [`EmbeddingVector`](vectra_core::EmbeddingVector)s.
//!
//! [`HashEmbedder`] is a deterministic, dependency-free stand-in for a real
//! multimodal model, used by the demo command and the test suite.

pub mod hash;
pub mod normalize;

pub use hash::{HashEmbedder, DEFAULT_DIMENSION};
pub use normalize::normalize;
