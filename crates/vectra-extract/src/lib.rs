//! # vectra-extract
//!
//! Content type detection and format extraction.
//!
//! Turns raw file bytes into a canonical [`ContentItem`](vectra_core::ContentItem):
//!
//! | Input | Extractor | Payload |
//! |-------|-----------|---------|
//! | txt, md, unknown | [`text`] | decoded UTF-8 text |
//! | pdf | [`pdf`] | page-joined text with page markers |
//! | csv, xlsx, xls | [`tabular`] | deterministic tabular summary |
//! | jpg, png, gif, webp, bmp | [`image`] | base64 passthrough of the bytes |
//!
//! [`detect`] classifies the file from its extension (with informational
//! byte sniffing) and the [`Dispatcher`] routes to the extractor, enforcing
//! per-category size ceilings first.

pub mod detect;
pub mod dispatcher;
pub mod image;
pub mod pdf;
pub mod tabular;
pub mod text;

pub use dispatcher::{Dispatcher, SizeLimits};

use vectra_core::{Metadata, Payload};

/// Output of a format extractor: the canonical payload plus
/// extractor-specific metadata. The dispatcher adds provenance fields on top.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub payload: Payload,
    pub metadata: Metadata,
}
