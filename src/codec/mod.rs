//! Image codec seam.
//!
//! The [`ImageCodec`] trait defines the four operations the resize pipeline
//! needs: dimension probe, decode, scale, and encode. The production
//! implementation is [`RasterCodec`](raster::RasterCodec) — pure Rust on the
//! `image` crate. Tests swap in a recording codec to assert which operations
//! ran (and, more importantly, which did not).

pub mod raster;

pub use raster::RasterCodec;

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("no codec recognizes the image data")]
    UnknownFormat,
    #[error("dimension probe failed: {0}")]
    Probe(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Result of a dimension probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image codecs.
///
/// `probe_dimensions` must read only the format header, never the full pixel
/// data — the pipeline relies on it being cheap enough to run before deciding
/// whether a decode is necessary at all.
pub trait ImageCodec: Sync {
    /// Read pixel dimensions from the format header.
    fn probe_dimensions(&self, bytes: &[u8]) -> Result<Dimensions, CodecError>;

    /// Decode encoded bytes into a raster.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Scale so the long edge equals `target_size`, preserving aspect ratio.
    fn scale(&self, image: &DynamicImage, target_size: u32) -> DynamicImage;

    /// Encode a raster into the given format.
    fn encode(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, CodecError>;
}
