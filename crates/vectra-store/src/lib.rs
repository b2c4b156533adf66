//! # vectra-store
//!
//! Content store implementations.
//!
//! Currently ships [`MemoryStore`], an in-process
//! [`ContentStore`](vectra_core::ContentStore) with deterministic
//! insertion-order queries. Persistent backends implement the same trait and
//! drop in without touching the pipeline.

pub mod memory;

pub use memory::MemoryStore;
