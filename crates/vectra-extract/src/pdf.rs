//! PDF text extraction using lopdf.
//!
//! Walks pages in document order, extracting text per page and joining
//! non-empty pages with a page marker so downstream consumers can still see
//! page boundaries in the flattened text.

use lopdf::Document;
use serde_json::json;
use tracing::debug;
use vectra_core::{ExtractError, Metadata, Payload};

use crate::Extraction;

/// Extract text from PDF bytes.
///
/// Pages that yield no text (scanned or image-only) are skipped entirely,
/// marker included. The result is trimmed; a PDF with no extractable text at
/// all produces an empty payload, which the dispatcher rejects.
pub fn extract_pdf(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::Format(format!("failed to parse PDF: {e}")))?;

    let pages = doc.get_pages();
    let page_count = pages.len();
    debug!(pages = page_count, "extracting PDF text");

    let mut sections = Vec::new();
    for page_num in pages.keys() {
        let page_text = doc
            .extract_text(&[*page_num])
            .map_err(|e| ExtractError::Format(format!("failed to extract page {page_num}: {e}")))?;
        let page_text = page_text.trim();
        if page_text.is_empty() {
            continue;
        }
        sections.push(format!("\n--- Page {page_num} ---\n{page_text}"));
    }

    let text = sections.concat().trim().to_string();

    let mut metadata = Metadata::new();
    metadata.insert("pages".to_string(), json!(page_count));
    metadata.insert("text_length".to_string(), json!(text.chars().count()));

    Ok(Extraction {
        payload: Payload::Text(text),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    // Minimal single-page PDF with a text object, built by hand.
    fn minimal_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(lopdf::dictionary! {
            "Font" => lopdf::dictionary! { "F1" => font_id },
        });
        let content_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
            lopdf::dictionary! {},
            stream.into_bytes(),
        )));
        let page_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = lopdf::dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, lopdf::Object::Dictionary(pages));
        let catalog_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extract_pdf_single_page() {
        let bytes = minimal_pdf("Hello PDF");
        let extraction = extract_pdf(&bytes).unwrap();
        let text = extraction.payload.as_str();
        assert!(text.contains("Hello PDF"), "got: {text}");
        assert!(text.contains("--- Page 1 ---"), "got: {text}");
        assert_eq!(extraction.metadata["pages"], 1);
    }

    #[test]
    fn test_extract_pdf_records_text_length() {
        let bytes = minimal_pdf("abc");
        let extraction = extract_pdf(&bytes).unwrap();
        let expected = extraction.payload.as_str().chars().count();
        assert_eq!(extraction.metadata["text_length"], expected);
    }

    #[test]
    fn test_extract_pdf_invalid_bytes() {
        let result = extract_pdf(b"this is not a pdf");
        assert!(matches!(result, Err(ExtractError::Format(_))));
    }

    #[test]
    fn test_extract_pdf_empty_bytes() {
        assert!(extract_pdf(b"").is_err());
    }
}
