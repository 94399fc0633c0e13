//! The resize orchestrator.
//!
//! [`Resizer::resize_and_cache`] is the public entry point: normalize the
//! source to bytes, compute the content key, and either return the cached
//! file or populate it — skipping the scale step entirely when the input is
//! already exactly the target size.
//!
//! The internal pipeline is an ordinary `Result` chain; the single terminal
//! step at the public boundary maps any error to the error placeholder, so
//! the caller always receives a usable file and never an error. The only
//! caller-visible signal of trouble is that the returned file is the generic
//! placeholder rather than a properly resized image.
//!
//! Population is serialized per key, not globally: each in-flight key holds
//! its own lock, created on demand and evicted once uncontended, so resizes
//! of unrelated images proceed concurrently while at most one thread
//! populates any given key.

use crate::cache::CacheStore;
use crate::codec::{CodecError, ImageCodec, RasterCodec};
use crate::key::ContentKey;
use crate::source::{ImageSource, normalize_to_buffer};
use image::ImageFormat;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("invalid target size: {0} (must be at least 1)")]
    InvalidTarget(u32),
    #[error("unable to read image source: {0}")]
    UnreadableSource(String),
    #[error("unreadable image data: {0}")]
    UnreadableImage(#[from] CodecError),
    #[error("cache read failed: {0}")]
    CacheRead(#[source] std::io::Error),
    #[error("cache write failed: {0}")]
    CacheWrite(#[source] std::io::Error),
}

/// Content-addressed resize cache.
///
/// Stateless aside from the cache directory: two resizers pointed at the same
/// directory share entries, and entries survive the process.
pub struct Resizer<C = RasterCodec> {
    cache: CacheStore,
    codec: C,
    locks: KeyLocks,
}

impl Resizer<RasterCodec> {
    pub fn new(cache: CacheStore) -> Self {
        Self::with_codec(cache, RasterCodec::new())
    }
}

impl<C: ImageCodec> Resizer<C> {
    pub fn with_codec(cache: CacheStore, codec: C) -> Self {
        Self {
            cache,
            codec,
            locks: KeyLocks::default(),
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub(crate) fn codec(&self) -> &C {
        &self.codec
    }

    pub(crate) fn locks(&self) -> &KeyLocks {
        &self.locks
    }

    /// Resize `source` to an icon whose long edge is `target_size` pixels,
    /// caching the result. Repeated calls with identical bytes and size
    /// return the same cached file without re-decoding.
    ///
    /// An empty source returns `None` — a documented no-op, not a failure.
    /// Every other input returns `Some(path)`: on any internal failure
    /// (unreadable source, unrecognized format, cache I/O, zero target size)
    /// the path is the error placeholder rather than a resized image.
    pub fn resize_and_cache(&self, target_size: u32, source: ImageSource) -> Option<PathBuf> {
        if source.is_empty() {
            return None;
        }

        match self.lookup_or_populate(target_size, source) {
            Ok(path) => Some(path),
            Err(err) => {
                error!(target_size, %err, "resize failed, serving error placeholder");
                Some(self.error_placeholder())
            }
        }
    }

    fn lookup_or_populate(
        &self,
        target_size: u32,
        source: ImageSource,
    ) -> Result<PathBuf, ResizeError> {
        if target_size == 0 {
            return Err(ResizeError::InvalidTarget(target_size));
        }

        let buffer = normalize_to_buffer(&self.codec, source)?;
        let key = ContentKey::new(target_size, &buffer.bytes);

        self.locks.with_lock(key.as_str(), || {
            if let Some(path) = self.cache.get(key.as_str()).map_err(ResizeError::CacheRead)? {
                debug!(key = %key, "cache hit");
                return Ok(path);
            }

            let dims = self.codec.probe_dimensions(&buffer.bytes)?;
            if dims.width == target_size && dims.height == target_size {
                // already the right size, cache the original bytes verbatim
                debug!(key = %key, "source already at target size");
                let ext = extension_for(buffer.format.unwrap_or(ImageFormat::Png));
                return self
                    .cache
                    .put(key.as_str(), ext, &buffer.bytes)
                    .map_err(ResizeError::CacheWrite);
            }

            // prefer the source format; fall back to lossless PNG when the
            // format is unknown or has no encoder compiled in
            let format = buffer
                .format
                .filter(|f| f.writing_enabled())
                .unwrap_or(ImageFormat::Png);

            let decoded = self.codec.decode(&buffer.bytes)?;
            let scaled = self.codec.scale(&decoded, target_size);
            let encoded = self.codec.encode(&scaled, format)?;

            debug!(key = %key, ?format, "cached resized image");
            self.cache
                .put(key.as_str(), extension_for(format), &encoded)
                .map_err(ResizeError::CacheWrite)
        })
    }
}

/// Preferred file extension for a format.
fn extension_for(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("png")
}

/// Per-key lock map: one mutex per in-flight key, created on demand and
/// evicted when no thread holds it anymore.
#[derive(Default)]
pub(crate) struct KeyLocks {
    cells: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Run `f` while holding the lock for `key`.
    pub(crate) fn with_lock<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            cells.entry(key.to_owned()).or_default().clone()
        };

        let guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f();
        drop(guard);
        drop(cell);

        // evict the cell unless another thread still holds a clone
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = cells.get(key)
            && Arc::strong_count(existing) == 1
        {
            cells.remove(key);
        }
        out
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
