//! Error types for vectra.
//!
//! Every stage of the pipeline has its own error enum; the top-level
//! [`Error`] wraps them so a request failure always carries the originating
//! typed error and its cause string. No stage catches-and-ignores: a failure
//! anywhere between detection and normalization aborts the whole request.

use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Content extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Vector contract violation (dimension, finiteness, degeneracy)
    #[error("vector error: {0}")]
    Vector(#[from] VectorError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An external collaborator did not answer within its deadline
    #[error("upstream timeout during {0}")]
    UpstreamTimeout(&'static str),

    /// Caller-supplied parameters were out of contract
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Content extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Malformed or undecodable input to an extractor. Recoverable: the
    /// specific item could not be ingested, nothing else is affected.
    #[error("format error: {0}")]
    Format(String),

    /// Input exceeds the configured size ceiling. Policy violation,
    /// reported and not retried.
    #[error("file too large: {size} bytes (max: {limit})")]
    SizeLimit { size: u64, limit: u64 },

    /// No extractor applies. Should be unreachable given the plain-text
    /// fallback; reaching it indicates a dispatcher bug.
    #[error("unsupported format: {0}")]
    Unsupported(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Vector normalization errors.
///
/// All of these are embedder contract violations: fatal to the current
/// request and never silently coerced, since coercion would corrupt ranking
/// for every stored vector.
#[derive(Error, Debug)]
pub enum VectorError {
    /// Raw vector length differs from the embedder's declared dimension
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A component is NaN or infinite
    #[error("non-finite value at component {index}")]
    NonFinite { index: usize },

    /// All-zero vector; cannot be compared by cosine similarity
    #[error("degenerate zero vector")]
    Degenerate,
}

/// Embedding generation errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Model inference failed
    #[error("inference failed: {0}")]
    Inference(String),

    /// The embedder does not support this modality
    #[error("modality not supported: {0}")]
    ModalityNotSupported(crate::types::Modality),

    /// The embedder is not initialized yet
    #[error("embedder not ready")]
    NotReady,
}

/// Content store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("insert failed: {0}")]
    Insert(String),

    #[error("query failed: {0}")]
    Query(String),

    /// The store is unreachable; transient, safe for the caller to retry
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
