//! # icon-cache
//!
//! A content-addressed resize cache for tray and menu icons. Given an image
//! source — file path, URL, in-memory bytes, or decoded raster — and a target
//! square pixel size, it produces a cached, correctly-sized image file on
//! persistent storage, computing each distinct (size, content) pair exactly
//! once and reusing it thereafter.
//!
//! ```no_run
//! use icon_cache::{CacheStore, ImageSource, Resizer};
//!
//! let resizer = Resizer::new(CacheStore::in_user_cache("my-app/icons"));
//! let icon = resizer.resize_and_cache(32, ImageSource::Path("logo.png".into()));
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resize`] | The orchestrator — normalize, hash, lookup-or-populate, per-key locking |
//! | [`cache`] | Content-addressed on-disk blob store; the file name is the index |
//! | [`key`] | `ContentKey` — `{size}_{sha256}` composite keys |
//! | [`source`] | `ImageSource` variants and normalization to one byte buffer |
//! | [`codec`] | `ImageCodec` seam: probe, decode, scale, encode (pure-Rust `image` backend) |
//! | [`placeholder`] | Error and transparent placeholders — the fallback policy |
//! | [`display`] | `DisplayConfig` — tray/entry icon sizes from the platform DPI probe |
//!
//! # Design Decisions
//!
//! ## Never fail, degrade instead
//!
//! [`Resizer::resize_and_cache`] does not return a `Result`. Icons are
//! cosmetic: a caller setting up a tray menu has nothing useful to do with a
//! decode error, so every internal failure degrades to a generic, bundled
//! error image and is logged via `tracing`. The one exception is failing to
//! write that bundled image itself, which panics — at that point the
//! deployment is broken and there is no safety net left.
//!
//! ## Content-addressed, no index file
//!
//! Cache entries are named `{target_size}_{sha256_of_bytes}.{ext}`. Identical
//! bytes reaching the resizer as a path, a URL, or a buffer hash to the same
//! key and share one entry. There is no manifest: the existence of a
//! correctly-named file is the index, which keeps concurrent access simple
//! (writes are temp-then-rename) and makes the cache trivially inspectable.
//!
//! ## Per-key population locks
//!
//! Populating a key is serialized per key rather than behind one global
//! lock: a map of in-flight keys to mutexes, created on demand and dropped
//! when uncontended. Unrelated icons resize concurrently; the same icon is
//! never resized twice in parallel.

pub mod cache;
pub mod codec;
pub mod display;
pub mod key;
pub mod placeholder;
pub mod resize;
pub mod source;

pub use cache::CacheStore;
pub use codec::{CodecError, Dimensions, ImageCodec, RasterCodec};
pub use display::{DEFAULT_ENTRY_SIZE, DEFAULT_TRAY_SIZE, DisplayConfig, ScalingFactor};
pub use key::ContentKey;
pub use resize::{ResizeError, Resizer};
pub use source::ImageSource;

#[cfg(test)]
pub(crate) mod test_helpers;
