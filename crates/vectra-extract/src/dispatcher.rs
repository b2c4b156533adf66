//! Extraction dispatcher.
//!
//! Owns the detect → size-check → extract sequence for file ingestion and
//! assembles the final [`ContentItem`]. Decoding runs on the blocking thread
//! pool; the dispatcher itself holds no mutable state and can be shared
//! freely.

use serde_json::json;
use tracing::debug;
use uuid::Uuid;
use vectra_core::{ContentItem, ExtractError, FileCategory, Metadata};

use crate::{detect, image, pdf, tabular, text};

/// Size ceilings applied before any extraction work.
#[derive(Debug, Clone, Copy)]
pub struct SizeLimits {
    /// Ceiling for documents and tabular data, in bytes
    pub default: u64,
    /// Ceiling for images, in bytes
    pub image: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            default: 50 * 1024 * 1024,
            image: 10 * 1024 * 1024,
        }
    }
}

/// Routes file bytes to the right format extractor.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    limits: SizeLimits,
}

impl Dispatcher {
    #[must_use]
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    /// Extract a file into a [`ContentItem`].
    ///
    /// Sequence: detect the type, enforce the category's size ceiling, run
    /// the format extractor on the blocking pool, then merge provenance
    /// metadata. Provenance keys (`filename`, `file_size`, `file_category`,
    /// `file_extension`) win over extractor keys on collision, so callers can
    /// always trust them.
    pub async fn extract_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ContentItem, ExtractError> {
        let detected = detect::detect(filename, &bytes);
        debug!(
            filename,
            category = %detected.category,
            format = %detected.format,
            size = bytes.len(),
            "dispatching extraction"
        );

        let limit = match detected.category {
            FileCategory::Image => self.limits.image,
            _ => self.limits.default,
        };
        let size = bytes.len() as u64;
        if size > limit {
            return Err(ExtractError::SizeLimit { size, limit });
        }

        let category = detected.category;
        let format = detected.format.clone();
        let mut extraction = tokio::task::spawn_blocking(move || match category {
            FileCategory::Image => image::extract_image(&bytes),
            FileCategory::Document => match format.as_str() {
                "pdf" => pdf::extract_pdf(&bytes),
                _ => text::extract_text(&bytes),
            },
            FileCategory::Data => match format.as_str() {
                "xlsx" => tabular::extract_xlsx(&bytes),
                "xls" => tabular::extract_xls(&bytes),
                _ => tabular::extract_csv(&bytes),
            },
            FileCategory::Unknown => text::extract_text(&bytes),
        })
        .await
        .map_err(|e| ExtractError::Format(format!("extraction task failed: {e}")))??;

        if extraction.payload.is_empty() {
            return Err(ExtractError::Format(format!(
                "no content extracted from {filename}"
            )));
        }

        merge_provenance(&mut extraction.metadata, filename, size, &detected);

        Ok(ContentItem {
            content_id: Uuid::new_v4().to_string(),
            modality: extraction.payload.modality(),
            payload: extraction.payload,
            metadata: extraction.metadata,
        })
    }
}

/// Overlay provenance fields onto extractor metadata, winning collisions.
fn merge_provenance(
    metadata: &mut Metadata,
    filename: &str,
    size: u64,
    detected: &vectra_core::DetectedType,
) {
    metadata.insert("filename".to_string(), json!(filename));
    metadata.insert("file_size".to_string(), json!(size));
    metadata.insert(
        "file_category".to_string(),
        json!(detected.category.to_string()),
    );
    metadata.insert("file_extension".to_string(), json!(detected.format));
    if let Some(mime) = &detected.sniffed_mime {
        metadata.insert("sniffed_mime".to_string(), json!(mime));
    }
}
