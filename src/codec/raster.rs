//! Pure Rust codec on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Dimension probe | `ImageReader::into_dimensions` (header-only read) |
//! | Decode (PNG, JPEG, GIF, BMP, ICO, TIFF, WebP) | `image` crate decoders |
//! | Scale | `DynamicImage::resize` with `Lanczos3` filter |
//! | Encode | `DynamicImage::write_to`, format-specific encoders |

use super::{CodecError, Dimensions, ImageCodec};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Production codec using the `image` crate ecosystem.
#[derive(Debug, Default)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for RasterCodec {
    fn probe_dimensions(&self, bytes: &[u8]) -> Result<Dimensions, CodecError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Probe(e.to_string()))?;
        if reader.format().is_none() {
            return Err(CodecError::UnknownFormat);
        }
        // into_dimensions reads the format header only, not the pixel data
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CodecError::Probe(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn scale(&self, image: &DynamicImage, target_size: u32) -> DynamicImage {
        // resize fits within the target box, so the long edge lands on
        // target_size and the short edge follows the aspect ratio
        image.resize(target_size, target_size, FilterType::Lanczos3)
    }

    fn encode(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
        let mut out = Cursor::new(Vec::new());
        let written = match format {
            // the JPEG encoder rejects alpha channels
            ImageFormat::Jpeg => {
                DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut out, format)
            }
            _ => image.write_to(&mut out, format),
        };
        written.map_err(|e| CodecError::Encode(format!("{format:?}: {e}")))?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, png_bytes};

    #[test]
    fn probe_reads_png_dimensions() {
        let codec = RasterCodec::new();
        let dims = codec.probe_dimensions(&png_bytes(200, 150)).unwrap();
        assert_eq!(
            dims,
            Dimensions {
                width: 200,
                height: 150
            }
        );
    }

    #[test]
    fn probe_reads_jpeg_dimensions() {
        let codec = RasterCodec::new();
        let dims = codec.probe_dimensions(&jpeg_bytes(64, 48)).unwrap();
        assert_eq!(dims.width, 64);
        assert_eq!(dims.height, 48);
    }

    #[test]
    fn probe_rejects_unrecognized_bytes() {
        let codec = RasterCodec::new();
        let result = codec.probe_dimensions(b"definitely not an image");
        assert!(matches!(result, Err(CodecError::UnknownFormat)));
    }

    #[test]
    fn decode_rejects_truncated_png() {
        let codec = RasterCodec::new();
        let mut bytes = png_bytes(50, 50);
        bytes.truncate(20);
        assert!(codec.decode(&bytes).is_err());
    }

    #[test]
    fn scale_puts_long_edge_on_target() {
        let codec = RasterCodec::new();
        let img = codec.decode(&png_bytes(100, 50)).unwrap();

        let scaled = codec.scale(&img, 40);
        assert_eq!(scaled.width(), 40);
        assert_eq!(scaled.height(), 20);
    }

    #[test]
    fn scale_portrait_puts_long_edge_on_target() {
        let codec = RasterCodec::new();
        let img = codec.decode(&png_bytes(50, 100)).unwrap();

        let scaled = codec.scale(&img, 40);
        assert_eq!(scaled.width(), 20);
        assert_eq!(scaled.height(), 40);
    }

    #[test]
    fn encode_roundtrips_through_png() {
        let codec = RasterCodec::new();
        let img = codec.decode(&png_bytes(30, 30)).unwrap();

        let encoded = codec.encode(&img, ImageFormat::Png).unwrap();
        let decoded = codec.decode(&encoded).unwrap();
        assert_eq!(decoded.width(), 30);
        assert_eq!(decoded.height(), 30);
    }

    #[test]
    fn encode_jpeg_accepts_rgba_input() {
        let codec = RasterCodec::new();
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            10,
            10,
            image::Rgba([10, 20, 30, 255]),
        ));
        let encoded = codec.encode(&img, ImageFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&encoded).unwrap(), ImageFormat::Jpeg);
    }
}
