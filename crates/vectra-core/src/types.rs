//! Core types for vectra.
//!
//! This module contains the shared data structures used across the pipeline:
//!
//! ## Ingestion
//! - [`Modality`]: semantic content type (text or image)
//! - [`FileCategory`]: coarse file classification used for extractor routing
//! - [`DetectedType`]: output of content type detection
//! - [`Payload`]: canonical content, UTF-8 text or base64-encoded binary
//! - [`ContentItem`]: the canonical ingestion unit
//!
//! ## Vectors & search
//! - [`EmbeddingVector`]: unit-norm embedding with a fixed dimension
//! - [`SimilarityCandidate`]: a stored entry surfaced during search
//! - [`RankedResult`]: a candidate with its computed similarity score
//!
//! ## Orchestration
//! - [`RequestState`]: per-request pipeline state machine
//! - [`StoreStats`]: store-level statistics

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata attached to content items and candidates.
///
/// Values are JSON scalars (strings, numbers, booleans); insertion order is
/// not significant.
pub type Metadata = HashMap<String, serde_json::Value>;

// ============================================================================
// Modality & file classification
// ============================================================================

/// Supported embedding modalities.
///
/// The modality decides which embedding function applies. Format extractors
/// may internally widen this: PDF and tabular content collapse to `Text`
/// before embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Coarse file classification produced by the content type detector.
///
/// Routing to format extractors matches exhaustively on this enum, so a
/// newly added category cannot silently fall through to the text fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Raster images (jpg, png, gif, webp, bmp)
    Image,
    /// Documents (pdf, txt, md)
    Document,
    /// Tabular data (csv, xlsx, xls)
    Data,
    /// Anything else; treated as plain text by the dispatcher
    Unknown,
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Document => write!(f, "document"),
            Self::Data => write!(f, "data"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of content type detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedType {
    /// File category derived from the extension table
    pub category: FileCategory,
    /// Lowercase extension, or `"unknown"` when the filename has none
    pub format: String,
    /// MIME type sniffed from the byte content.
    ///
    /// Informational only: the extension decides extractor routing, sniffing
    /// exists so a spoofed extension is at least visible in metadata.
    pub sniffed_mime: Option<String>,
}

// ============================================================================
// Payload & content items
// ============================================================================

/// Canonical content payload: UTF-8 text or a base64-encoded binary blob.
///
/// The variant fixes the modality, so a payload can never disagree with the
/// modality it is embedded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    /// Decoded UTF-8 text
    Text(String),
    /// Base64-encoded image bytes, unchanged from the source file
    EncodedImage(String),
}

impl Payload {
    /// The modality this payload is embedded under.
    #[must_use]
    pub fn modality(&self) -> Modality {
        match self {
            Self::Text(_) => Modality::Text,
            Self::EncodedImage(_) => Modality::Image,
        }
    }

    /// The raw payload string (text, or the base64 encoding).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::EncodedImage(s) => s,
        }
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

/// The canonical ingestion unit produced by extraction.
///
/// Invariant: `payload` is never empty after extraction succeeds, and its
/// variant matches `modality`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Caller-supplied or generated unique identifier
    pub content_id: String,
    /// Semantic content type
    pub modality: Modality,
    /// Canonical content
    pub payload: Payload,
    /// Provenance and extractor metadata.
    ///
    /// File-derived items always carry `filename`, `file_size`,
    /// `file_category` and `file_extension`.
    pub metadata: Metadata,
}

// ============================================================================
// Embedding vectors
// ============================================================================

/// A unit-norm embedding vector.
///
/// Values are private: the only ways to obtain an `EmbeddingVector` are the
/// normalizer (which enforces the fixed dimension, finite components and
/// unit L2 norm) or [`EmbeddingVector::from_normalized`] for callers that
/// already hold normalized data (stores, tests). Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    values: Vec<f32>,
}

impl EmbeddingVector {
    /// Wrap an already-normalized vector.
    ///
    /// The caller asserts the unit-norm invariant; vectors produced by
    /// anything other than the normalizer should go through
    /// `vectra_embed::normalize` instead.
    #[must_use]
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Number of components.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// The components, in order.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Dot product with another vector.
    ///
    /// Equals cosine similarity because both sides are unit-normalized.
    /// Returns 0.0 on dimension disagreement rather than panicking; the
    /// normalizer makes that case unreachable in practice.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }
}

// ============================================================================
// Search
// ============================================================================

/// A stored entry surfaced during search.
///
/// Owned by the storage collaborator; read-only to the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityCandidate {
    /// Stored content identifier
    pub content_id: String,
    /// Modality of the stored content
    pub modality: Modality,
    /// Original/display payload
    pub content: String,
    /// Stored metadata
    pub metadata: Metadata,
    /// Stored unit-norm vector
    pub vector: EmbeddingVector,
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// Stored content identifier
    pub content_id: String,
    /// Modality of the stored content
    pub modality: Modality,
    /// Original/display payload
    pub content: String,
    /// Cosine similarity to the query, in [-1.0, 1.0]
    pub similarity: f32,
    /// Stored metadata
    pub metadata: Metadata,
}

/// Store-level statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total stored items
    pub total_items: u64,
}

// ============================================================================
// Request state machine
// ============================================================================

/// Per-request pipeline state.
///
/// Requests move strictly forward:
/// `Received → Detected → Extracted → Embedded → Normalized →
/// (Stored | Ranked) → Completed`. Any stage failure transitions directly to
/// `Failed` with the originating typed error; there is no partial retry
/// within a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    Received,
    Detected,
    Extracted,
    Embedded,
    Normalized,
    Stored,
    Ranked,
    Completed,
    Failed,
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::Detected => "detected",
            Self::Extracted => "extracted",
            Self::Embedded => "embedded",
            Self::Normalized => "normalized",
            Self::Stored => "stored",
            Self::Ranked => "ranked",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Modality Tests ====================

    #[test]
    fn test_modality_serialization() {
        assert_eq!(serde_json::to_string(&Modality::Text).unwrap(), "\"text\"");
        assert_eq!(
            serde_json::to_string(&Modality::Image).unwrap(),
            "\"image\""
        );
    }

    #[test]
    fn test_modality_display() {
        assert_eq!(Modality::Text.to_string(), "text");
        assert_eq!(Modality::Image.to_string(), "image");
    }

    // ==================== FileCategory Tests ====================

    #[test]
    fn test_file_category_serialization() {
        assert_eq!(
            serde_json::to_string(&FileCategory::Image).unwrap(),
            "\"image\""
        );
        assert_eq!(
            serde_json::to_string(&FileCategory::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_file_category_display() {
        assert_eq!(FileCategory::Document.to_string(), "document");
        assert_eq!(FileCategory::Data.to_string(), "data");
    }

    // ==================== Payload Tests ====================

    #[test]
    fn test_payload_text_modality() {
        let payload = Payload::Text("red summer dress".to_string());
        assert_eq!(payload.modality(), Modality::Text);
        assert_eq!(payload.as_str(), "red summer dress");
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_payload_image_modality() {
        let payload = Payload::EncodedImage("aGVsbG8=".to_string());
        assert_eq!(payload.modality(), Modality::Image);
        assert_eq!(payload.as_str(), "aGVsbG8=");
    }

    #[test]
    fn test_payload_empty() {
        assert!(Payload::Text(String::new()).is_empty());
        assert!(!Payload::Text("x".to_string()).is_empty());
    }

    #[test]
    fn test_payload_serialization_roundtrip() {
        let payload = Payload::Text("hello".to_string());
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"kind\":\"text\""));
        let back: Payload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, back);
    }

    // ==================== ContentItem Tests ====================

    #[test]
    fn test_content_item_serialization() {
        let mut metadata = Metadata::new();
        metadata.insert("filename".to_string(), "note.txt".into());
        metadata.insert("file_size".to_string(), 42.into());

        let item = ContentItem {
            content_id: "item-1".to_string(),
            modality: Modality::Text,
            payload: Payload::Text("hello".to_string()),
            metadata,
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: ContentItem = serde_json::from_str(&json).unwrap();

        assert_eq!(back.content_id, "item-1");
        assert_eq!(back.modality, Modality::Text);
        assert_eq!(back.metadata.get("file_size"), Some(&42.into()));
    }

    // ==================== EmbeddingVector Tests ====================

    #[test]
    fn test_embedding_vector_dimension() {
        let v = EmbeddingVector::from_normalized(vec![0.6, 0.8]);
        assert_eq!(v.dimension(), 2);
        assert_eq!(v.values(), &[0.6, 0.8]);
    }

    #[test]
    fn test_dot_product_identical_unit_vectors() {
        let v = EmbeddingVector::from_normalized(vec![0.6, 0.8]);
        assert!((v.dot(&v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_orthogonal() {
        let a = EmbeddingVector::from_normalized(vec![1.0, 0.0]);
        let b = EmbeddingVector::from_normalized(vec![0.0, 1.0]);
        assert!(a.dot(&b).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_opposite() {
        let a = EmbeddingVector::from_normalized(vec![1.0, 0.0]);
        let b = EmbeddingVector::from_normalized(vec![-1.0, 0.0]);
        assert!((a.dot(&b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_dimension_mismatch_is_zero() {
        let a = EmbeddingVector::from_normalized(vec![1.0, 0.0]);
        let b = EmbeddingVector::from_normalized(vec![1.0, 0.0, 0.0]);
        assert_eq!(a.dot(&b), 0.0);
    }

    // ==================== RequestState Tests ====================

    #[test]
    fn test_request_state_display() {
        assert_eq!(RequestState::Received.to_string(), "received");
        assert_eq!(RequestState::Completed.to_string(), "completed");
        assert_eq!(RequestState::Failed.to_string(), "failed");
    }

    #[test]
    fn test_request_state_serialization() {
        assert_eq!(
            serde_json::to_string(&RequestState::Normalized).unwrap(),
            "\"normalized\""
        );
    }

    // ==================== StoreStats Tests ====================

    #[test]
    fn test_store_stats_default() {
        let stats = StoreStats::default();
        assert_eq!(stats.total_items, 0);
    }
}
