//! # vectra-core
//!
//! Core types and traits for vectra, a multimodal content ingestion and
//! similarity search pipeline.
//!
//! This crate provides the foundational abstractions shared by the rest of
//! the workspace:
//!
//! - **Ingestion**: [`ContentItem`], [`Payload`], [`Modality`],
//!   [`FileCategory`], [`DetectedType`]
//! - **Vectors**: [`EmbeddingVector`] with its unit-norm invariant
//! - **Search**: [`SimilarityCandidate`], [`RankedResult`]
//! - **Collaborator seams**: the [`Embedder`] and [`ContentStore`] traits
//! - **Errors**: typed per-stage errors rolled up into [`Error`]
//!
//! ## Architecture
//!
//! Data flows strictly forward through the pipeline:
//!
//! ```text
//! bytes → detect → extract → embed (external) → normalize → store
//!                                                    ↓
//!                                     query vector → rank → results
//! ```
//!
//! Every operation up to the external calls is a pure function of its
//! inputs; there is no shared mutable state and no locking in this crate.
//!
//! ## Related Crates
//!
//! - `vectra-extract`: content type detection and format extraction
//! - `vectra-embed`: vector normalization and a deterministic stub embedder
//! - `vectra-rank`: threshold-and-top-k similarity ranking
//! - `vectra-store`: in-memory [`ContentStore`] implementation
//! - `vectra-pipeline`: the per-request orchestrator

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EmbedError, Error, ExtractError, Result, StoreError, VectorError};
pub use traits::{ContentStore, Embedder};
pub use types::{
    ContentItem, DetectedType, EmbeddingVector, FileCategory, Metadata, Modality, Payload,
    RankedResult, RequestState, SimilarityCandidate, StoreStats,
};
