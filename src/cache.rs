//! Content-addressed blob store on persistent storage.
//!
//! One file per [`ContentKey`](crate::key::ContentKey), named `{key}.{ext}`
//! inside a dedicated cache directory. There is no manifest or index file:
//! the existence of a correctly-named file IS the index. Entries are never
//! mutated in place — a changed input always produces a new key — and this
//! module never deletes anything (eviction, if any, belongs to whoever owns
//! the cache directory).
//!
//! Writes publish atomically: bytes go to a dot-prefixed temp name first and
//! are renamed into place, so a concurrent reader of an unrelated key never
//! observes a partially written entry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic suffix for staging names. Process id alone is not enough:
/// two stores over the same directory in one process would share a staging
/// path for the same key, and one writer's rename would steal the other's
/// half-written file.
static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Extensions the resize pipeline produces, probed directly on lookup
/// before falling back to a directory scan.
const COMMON_EXTENSIONS: &[&str] = &["png", "jpg", "gif", "bmp", "ico", "tiff", "webp"];

/// On-disk cache directory with content-addressed get/put.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// A store rooted at an explicit directory. The directory is created
    /// lazily on first `put`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A store under the user's cache directory (falling back to the system
    /// temp directory), namespaced by `namespace`.
    pub fn in_user_cache(namespace: &str) -> Self {
        let base = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(base.join(namespace))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up the cached file for `key`.
    ///
    /// Returns `Ok(None)` when the entry is absent — including when the cache
    /// directory itself does not exist yet. The extension is not part of the
    /// key: the usual extensions are probed directly (lookups are the
    /// dominant fast path), with a directory scan as the fallback for
    /// anything cached under a less common one.
    pub fn get(&self, key: &str) -> io::Result<Option<PathBuf>> {
        for ext in COMMON_EXTENSIONS {
            let candidate = self.root.join(format!("{key}.{ext}"));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }

        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        for entry in dir {
            let path = entry?.path();
            if path.is_file() && path.file_stem().and_then(|s| s.to_str()) == Some(key) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Persist `bytes` under `key` with the given file extension, returning
    /// the published path.
    ///
    /// Safe to call concurrently with reads of unrelated keys: the bytes are
    /// written to a unique staging name and renamed into place. Concurrent
    /// puts of the same key both succeed; with content-addressed keys the
    /// payloads are identical, so last-rename-wins is harmless.
    pub fn put(&self, key: &str, ext: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;

        let published = self.root.join(format!("{key}.{ext}"));
        let staging = self.root.join(format!(
            ".{key}.{}.{}.tmp",
            std::process::id(),
            STAGING_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&staging, bytes)?;
        fs::rename(&staging, &published)?;
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_absent_key_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());
        assert_eq!(store.get("16_deadbeef").unwrap(), None);
    }

    #[test]
    fn get_with_missing_root_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("never-created"));
        assert_eq!(store.get("16_deadbeef").unwrap(), None);
    }

    #[test]
    fn put_then_get_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path().join("icons"));

        let path = store.put("16_abc", "png", b"png bytes").unwrap();
        assert_eq!(path.file_name().unwrap(), "16_abc.png");
        assert_eq!(fs::read(&path).unwrap(), b"png bytes");

        assert_eq!(store.get("16_abc").unwrap(), Some(path));
    }

    #[test]
    fn get_matches_stem_regardless_of_extension() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());

        store.put("32_key", "jpg", b"jpeg bytes").unwrap();
        let found = store.get("32_key").unwrap().unwrap();
        assert_eq!(found.extension().unwrap(), "jpg");
    }

    #[test]
    fn get_ignores_other_keys() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());

        store.put("16_aaa", "png", b"a").unwrap();
        assert_eq!(store.get("16_bbb").unwrap(), None);
    }

    #[test]
    fn put_leaves_no_staging_files() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());

        store.put("48_k", "png", b"data").unwrap();
        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["48_k.png".to_string()]);
    }

    #[test]
    fn get_falls_back_to_scanning_for_unusual_extensions() {
        let tmp = TempDir::new().unwrap();
        let store = CacheStore::new(tmp.path());

        store.put("16_odd", "xyz", b"bytes").unwrap();
        let found = store.get("16_odd").unwrap().unwrap();
        assert_eq!(found.extension().unwrap(), "xyz");
    }

    #[test]
    fn concurrent_same_key_puts_from_separate_stores_both_succeed() {
        // Two stores over one directory share no in-process state, so the
        // staging names must not collide even for the same key.
        let tmp = TempDir::new().unwrap();

        for _ in 0..50 {
            let a = CacheStore::new(tmp.path());
            let b = CacheStore::new(tmp.path());

            let writer_a = std::thread::spawn(move || a.put("16_samekey", "png", b"payload"));
            let writer_b = std::thread::spawn(move || b.put("16_samekey", "png", b"payload"));

            let result_a = writer_a.join().unwrap();
            let result_b = writer_b.join().unwrap();
            assert!(result_a.is_ok(), "first writer failed: {result_a:?}");
            assert!(result_b.is_ok(), "second writer failed: {result_b:?}");
        }

        assert_eq!(
            fs::read(tmp.path().join("16_samekey.png")).unwrap(),
            b"payload"
        );
    }

    #[test]
    fn in_user_cache_appends_namespace() {
        let store = CacheStore::in_user_cache("icon-cache-test");
        assert!(store.root().ends_with("icon-cache-test"));
    }
}
