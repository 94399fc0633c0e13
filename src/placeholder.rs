//! Fallback placeholders.
//!
//! Two flavors, both cached like any other entry:
//!
//! - The **error placeholder** is served whenever the resize machinery fails
//!   for a non-empty source. It comes from a bundled resource, is cached once
//!   under a fixed key, and is removed when the process exits — it is a
//!   derivative of a bundled asset, not durable state.
//! - The **transparent placeholder** is an on-demand, fully transparent
//!   square of a requested size, for callers that need an empty icon. It is
//!   a pure function of the size and safe to regenerate on a cold cache.

use crate::codec::ImageCodec;
use crate::key::ContentKey;
use crate::resize::{ResizeError, Resizer};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::PathBuf;
use std::sync::{Once, OnceLock};
use tracing::error;

/// Fixed cache key for the error placeholder.
pub(crate) const ERROR_KEY: &str = "error_32";

/// Bundled fallback image, 32x32 PNG.
static ERROR_IMAGE_PNG: &[u8] = include_bytes!("../assets/error_32.png");

static ERROR_IMAGE_PATH: OnceLock<PathBuf> = OnceLock::new();
static EXIT_CLEANUP: Once = Once::new();

extern "C" fn remove_error_placeholder() {
    if let Some(path) = ERROR_IMAGE_PATH.get() {
        let _ = std::fs::remove_file(path);
    }
}

impl<C: ImageCodec> Resizer<C> {
    /// The generic error image, materialized into the cache on first use.
    ///
    /// # Panics
    ///
    /// Panics if the bundled resource cannot be written to the cache. At that
    /// point there is no safety net left: every other failure in this crate
    /// degrades to this image, so being unable to produce it indicates a
    /// broken deployment rather than a transient input problem.
    pub fn error_placeholder(&self) -> PathBuf {
        if let Ok(Some(path)) = self.cache().get(ERROR_KEY) {
            return path;
        }

        match self.cache().put(ERROR_KEY, "png", ERROR_IMAGE_PNG) {
            Ok(path) => {
                let _ = ERROR_IMAGE_PATH.set(path.clone());
                EXIT_CLEANUP.call_once(|| unsafe {
                    libc::atexit(remove_error_placeholder);
                });
                path
            }
            Err(err) => panic!("unable to materialize the bundled error image: {err}"),
        }
    }

    /// A fully transparent `size`×`size` square, cached under `{size}_empty`.
    ///
    /// Idempotent: repeated calls for the same size return the same file.
    /// Falls back to the error placeholder if the image cannot be encoded or
    /// written.
    pub fn transparent_placeholder(&self, size: u32) -> PathBuf {
        match self.transparent_inner(size) {
            Ok(path) => path,
            Err(err) => {
                error!(size, %err, "transparent placeholder failed, serving error placeholder");
                self.error_placeholder()
            }
        }
    }

    fn transparent_inner(&self, size: u32) -> Result<PathBuf, ResizeError> {
        if size == 0 {
            return Err(ResizeError::InvalidTarget(size));
        }

        let key = ContentKey::transparent(size);
        self.locks().with_lock(key.as_str(), || {
            if let Some(path) = self.cache().get(key.as_str()).map_err(ResizeError::CacheRead)? {
                return Ok(path);
            }

            let blank =
                DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0])));
            let encoded = self.codec().encode(&blank, ImageFormat::Png)?;
            self.cache()
                .put(key.as_str(), "png", &encoded)
                .map_err(ResizeError::CacheWrite)
        })
    }
}
