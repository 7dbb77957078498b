// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Raw byte to image decoding

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::acquire::ImageBytes;

/// Maximum image size accepted by the decoder (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Errors turning raw bytes into a decoded image
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image data is empty")]
    EmptyData,

    #[error("image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("unrecognized image format in {0} byte payload")]
    UnsupportedFormat(usize),

    #[error("failed to decode {size} byte {format:?} image: {message}")]
    DecodeFailed {
        size: usize,
        format: ImageFormat,
        message: String,
    },
}

/// Decode raw image bytes into a [`DynamicImage`].
///
/// Detects the format from magic bytes before handing the payload to the
/// `image` crate, so an unrecognized payload fails fast with the byte
/// length rather than a generic decoder error. Decoding is atomic; there
/// are no partial results.
pub fn decode_image_bytes(bytes: &ImageBytes) -> Result<DynamicImage, DecodeError> {
    let data = &bytes.data;

    if data.is_empty() {
        return Err(DecodeError::EmptyData);
    }
    if data.len() > MAX_IMAGE_SIZE {
        return Err(DecodeError::TooLarge(data.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(data).ok_or(DecodeError::UnsupportedFormat(data.len()))?;

    image::load_from_memory_with_format(data, format).map_err(|e| DecodeError::DecodeFailed {
        size: data.len(),
        format,
        message: e.to_string(),
    })
}

/// Detect image format from magic bytes.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.len() < 4 {
        return None;
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Some(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Some(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Some(ImageFormat::Tiff),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use bytes::Bytes;

    // 1x1 red PNG image (base64)
    const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    // GIF magic bytes (base64 of "GIF89a" + minimal data)
    const TINY_GIF_BASE64: &str = "R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

    fn image_bytes(data: Vec<u8>) -> ImageBytes {
        ImageBytes::new(Bytes::from(data), None)
    }

    #[test]
    fn test_decode_png() {
        let data = STANDARD.decode(TINY_PNG_BASE64).unwrap();
        let img = decode_image_bytes(&image_bytes(data)).unwrap();
        assert_eq!(img.width(), 1);
        assert_eq!(img.height(), 1);
    }

    #[test]
    fn test_decode_gif() {
        let data = STANDARD.decode(TINY_GIF_BASE64).unwrap();
        let img = decode_image_bytes(&image_bytes(data)).unwrap();
        assert_eq!(img.width(), 1);
    }

    #[test]
    fn test_decode_empty() {
        let result = decode_image_bytes(&image_bytes(vec![]));
        assert!(matches!(result, Err(DecodeError::EmptyData)));
    }

    #[test]
    fn test_decode_too_large() {
        let result = decode_image_bytes(&image_bytes(vec![0u8; MAX_IMAGE_SIZE + 1]));
        assert!(matches!(result, Err(DecodeError::TooLarge(_, _))));
    }

    #[test]
    fn test_decode_unrecognized_payload_names_length() {
        let result = decode_image_bytes(&image_bytes(vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05]));
        match result {
            Err(DecodeError::UnsupportedFormat(len)) => assert_eq!(len, 6),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        // PNG header but corrupted data
        let result = decode_image_bytes(&image_bytes(vec![
            0x89, 0x50, 0x4E, 0x47, 0x00, 0x00, 0x00, 0x00,
        ]));
        match result {
            Err(DecodeError::DecodeFailed { format, size, .. }) => {
                assert_eq!(format, ImageFormat::Png);
                assert_eq!(size, 8);
            }
            other => panic!("expected DecodeFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_format_png() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_format(&png_header), Some(ImageFormat::Png));
    }

    #[test]
    fn test_detect_format_jpeg() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format(&jpeg_header), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_detect_format_gif_variants() {
        assert_eq!(
            detect_format(&[0x47, 0x49, 0x46, 0x38, 0x37, 0x61]),
            Some(ImageFormat::Gif)
        );
        assert_eq!(
            detect_format(&[0x47, 0x49, 0x46, 0x38, 0x39, 0x61]),
            Some(ImageFormat::Gif)
        );
    }

    #[test]
    fn test_detect_format_webp() {
        let webp_header = [
            0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50,
        ];
        assert_eq!(detect_format(&webp_header), Some(ImageFormat::WebP));
    }

    #[test]
    fn test_detect_format_unknown() {
        assert_eq!(detect_format(&[0x00, 0x00, 0x00, 0x00]), None);
        assert_eq!(detect_format(&[0x89]), None);
    }
}
