//! Image source normalization.
//!
//! Every shape of input — file path, URL, in-memory bytes, decoded raster —
//! funnels through [`normalize_to_buffer`] into one owned byte buffer before
//! anything else happens. Hashing, cache lookup, and the resize pipeline all
//! operate on that buffer, which is what makes the cache key independent of
//! where the bytes came from.

use crate::codec::ImageCodec;
use crate::resize::ResizeError;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// One image input, owned by the caller until consumed by the resizer.
pub enum ImageSource {
    /// A file on disk.
    Path(PathBuf),
    /// An HTTP(S) URL, fetched with a plain GET.
    Url(String),
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
    /// An already-decoded raster.
    Raster(DynamicImage),
}

impl ImageSource {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// An empty source is a documented no-op for the resizer: no file, no
    /// error. A raster is never empty — it already carries pixel data.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Path(path) => path.as_os_str().is_empty(),
            Self::Url(url) => url.is_empty(),
            Self::Bytes(bytes) => bytes.is_empty(),
            Self::Raster(_) => false,
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        Self::Raster(image)
    }
}

/// Normalized source: the bytes to hash and resize, plus the sniffed format.
pub(crate) struct SourceBuffer {
    pub bytes: Vec<u8>,
    /// Format detected from the byte content, `None` when unrecognized.
    pub format: Option<ImageFormat>,
}

/// Turn any source into an owned byte buffer.
///
/// A `Bytes` source is already addressable and is passed through without
/// copying; paths and URLs are read fully; a raster is encoded to PNG once so
/// it has stable bytes to hash.
pub(crate) fn normalize_to_buffer(
    codec: &impl ImageCodec,
    source: ImageSource,
) -> Result<SourceBuffer, ResizeError> {
    let bytes = match source {
        ImageSource::Bytes(bytes) => bytes,
        ImageSource::Path(path) => fs::read(&path)
            .map_err(|e| ResizeError::UnreadableSource(format!("{}: {e}", path.display())))?,
        ImageSource::Url(url) => fetch_url(&url)?,
        ImageSource::Raster(image) => {
            let bytes = codec.encode(&image, ImageFormat::Png)?;
            return Ok(SourceBuffer {
                bytes,
                format: Some(ImageFormat::Png),
            });
        }
    };

    let format = image::guess_format(&bytes).ok();
    Ok(SourceBuffer { bytes, format })
}

fn fetch_url(url: &str) -> Result<Vec<u8>, ResizeError> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| ResizeError::UnreadableSource(format!("{url}: {e}")))?;
    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| ResizeError::UnreadableSource(format!("{url}: {e}")))
}
