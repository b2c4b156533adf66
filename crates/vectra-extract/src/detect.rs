//! Content type detection.
//!
//! Classifies a file into a [`FileCategory`] and concrete format from its
//! extension, and sniffs the byte content for a MIME type as a cross-check.
//! The extension is authoritative for extractor routing; the sniffed MIME is
//! informational metadata so a spoofed extension is at least visible.

use vectra_core::{DetectedType, FileCategory};

/// Extensions recognized per category.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];
const DATA_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

/// Detect the category and format of a file.
///
/// Pure function of its inputs. Unknown extensions yield
/// `FileCategory::Unknown` with the raw lowercase extension as `format`
/// (or `"unknown"` when the filename has none); the dispatcher later treats
/// unknown as plain text, so this is a fallback rather than a failure.
#[must_use]
pub fn detect(filename: &str, bytes: &[u8]) -> DetectedType {
    let format = extension_of(filename);
    let category = category_for(&format);

    DetectedType {
        category,
        format,
        sniffed_mime: sniff_mime(bytes).map(str::to_string),
    }
}

/// Lowercase extension of a filename, or `"unknown"` when absent.
fn extension_of(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or_else(|| "unknown".to_string(), str::to_lowercase)
}

/// Map an extension onto a category via the static table.
fn category_for(extension: &str) -> FileCategory {
    if IMAGE_EXTENSIONS.contains(&extension) {
        FileCategory::Image
    } else if DOCUMENT_EXTENSIONS.contains(&extension) {
        FileCategory::Document
    } else if DATA_EXTENSIONS.contains(&extension) {
        FileCategory::Data
    } else {
        FileCategory::Unknown
    }
}

/// Sniff a MIME type from magic numbers.
///
/// Covers the formats the pipeline routes on plus a UTF-8 probe; anything
/// else is `None`. Never consulted for routing decisions.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }
    // xlsx/docx and friends are zip containers
    if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        return Some("application/zip");
    }
    if !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() {
        return Some("text/plain");
    }
    None
}
