//! Image extraction.
//!
//! Images are not turned into text. The extractor validates that the bytes
//! decode as a real image, captures its dimensions, and passes the original
//! bytes through base64-encoded so a multimodal embedder can consume them
//! unmodified.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use tracing::debug;
use vectra_core::{ExtractError, Metadata, Payload};

use crate::Extraction;

/// Validate image bytes and produce a base64 passthrough payload.
///
/// Metadata records `width`, `height`, `format`, `mode` and `size_bytes` of
/// the decoded image. Encoding is always of the original bytes, never of a
/// re-encoded image.
pub fn extract_image(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let format = image::guess_format(bytes)
        .map_err(|e| ExtractError::Format(format!("unrecognized image format: {e}")))?;
    let img = image::load_from_memory(bytes)
        .map_err(|e| ExtractError::Format(format!("failed to decode image: {e}")))?;

    debug!(
        width = img.width(),
        height = img.height(),
        ?format,
        "decoded image"
    );

    let mut metadata = Metadata::new();
    metadata.insert("width".to_string(), json!(img.width()));
    metadata.insert("height".to_string(), json!(img.height()));
    metadata.insert(
        "format".to_string(),
        json!(format!("{format:?}").to_uppercase()),
    );
    metadata.insert("mode".to_string(), json!(format!("{:?}", img.color())));
    metadata.insert("size_bytes".to_string(), json!(bytes.len()));

    Ok(Extraction {
        payload: Payload::EncodedImage(STANDARD.encode(bytes)),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectra_core::Modality;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[test]
    fn test_extract_image_dimensions() {
        let bytes = png_bytes(4, 3);
        let extraction = extract_image(&bytes).unwrap();
        assert_eq!(extraction.metadata["width"], 4);
        assert_eq!(extraction.metadata["height"], 3);
        assert_eq!(extraction.metadata["format"], "PNG");
        assert_eq!(extraction.metadata["size_bytes"], bytes.len());
    }

    #[test]
    fn test_extract_image_payload_is_base64_of_original_bytes() {
        let bytes = png_bytes(2, 2);
        let extraction = extract_image(&bytes).unwrap();
        let Payload::EncodedImage(encoded) = &extraction.payload else {
            panic!("expected image payload");
        };
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
        assert_eq!(extraction.payload.modality(), Modality::Image);
    }

    #[test]
    fn test_extract_image_invalid_bytes() {
        let result = extract_image(b"definitely not an image");
        assert!(matches!(result, Err(ExtractError::Format(_))));
    }

    #[test]
    fn test_extract_image_truncated_png() {
        let mut bytes = png_bytes(8, 8);
        bytes.truncate(20);
        assert!(extract_image(&bytes).is_err());
    }
}
