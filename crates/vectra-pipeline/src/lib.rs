//! # vectra-pipeline
//!
//! The per-request orchestrator tying the pipeline stages together:
//! extraction ([`vectra_extract`]), embedding and normalization
//! ([`vectra_embed`]), ranking ([`vectra_rank`]) and storage (any
//! [`ContentStore`](vectra_core::ContentStore)).
//!
//! Construct a [`Pipeline`] with an embedder, a store and a
//! [`PipelineConfig`]; each `ingest`/`search` call is then an independent
//! request with its own deadline handling and failure path.

pub mod config;
pub mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::Pipeline;
