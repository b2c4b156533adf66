//! Plain text extraction.
//!
//! Handles `.txt` and `.md` documents and doubles as the fallback for
//! unrecognized extensions. Decoding is lossy UTF-8: invalid sequences become
//! replacement characters rather than failing the file.

use serde_json::json;
use vectra_core::{ExtractError, Metadata, Payload};

use crate::Extraction;

/// Extract plain text content.
///
/// Metadata records `char_count`, `word_count` and `line_count` of the
/// decoded text.
pub fn extract_text(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let text = String::from_utf8_lossy(bytes).into_owned();

    let mut metadata = Metadata::new();
    metadata.insert("char_count".to_string(), json!(text.chars().count()));
    metadata.insert(
        "word_count".to_string(),
        json!(text.split_whitespace().count()),
    );
    metadata.insert("line_count".to_string(), json!(text.lines().count()));

    Ok(Extraction {
        payload: Payload::Text(text),
        metadata,
    })
}
