//! Content cache for fetched documents
//!
//! This module provides a file-backed key-value store with:
//! - One JSON file per fetch key under the cache directory
//! - Time-based expiry (entries older than the freshness window are misses)
//! - Fail-open reads (unreadable or corrupt entries are misses)
//! - Atomic writes (temporary file, then rename)

mod entry;

pub use entry::{CacheKey, CachedDocument};

use chrono::Duration;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-backed document cache with a freshness window
#[derive(Debug, Clone)]
pub struct ContentCache {
    directory: PathBuf,
    freshness: Duration,
}

impl ContentCache {
    /// Creates a cache rooted at `directory`
    ///
    /// The directory is created lazily on the first write.
    pub fn new(directory: impl Into<PathBuf>, freshness: Duration) -> Self {
        Self {
            directory: directory.into(),
            freshness,
        }
    }

    /// Returns the cache directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Looks up a fresh entry
    ///
    /// # Arguments
    ///
    /// * `key` - The fetch key
    ///
    /// # Returns
    ///
    /// * `Some(CachedDocument)` - A fresh entry
    /// * `None` - No entry, an expired entry, or an unreadable entry
    pub fn get(&self, key: &CacheKey) -> Option<CachedDocument> {
        let path = self.path_for(key);
        let content = std::fs::read_to_string(&path).ok()?;

        let entry: CachedDocument = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if entry.is_stale(self.freshness) {
            tracing::trace!(
                "Cache entry for {} expired ({} hours old)",
                entry.url,
                entry.age().num_hours()
            );
            return None;
        }

        Some(entry)
    }

    /// Stores a document under `key`, replacing any previous entry
    ///
    /// Empty bodies are not stored.
    pub fn put(&self, key: &CacheKey, url: &str, rendered: bool, body: &str) -> std::io::Result<()> {
        if body.trim().is_empty() {
            return Ok(());
        }
        self.store(key, &CachedDocument::new(url, rendered, body))
    }

    fn store(&self, key: &CacheKey, entry: &CachedDocument) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.directory)?;

        let json = serde_json::to_string(entry)?;
        let final_path = self.path_for(key);
        let temp_path = self.directory.join(format!(
            "{}.{}.{}.tmp",
            key.as_str(),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        std::fs::write(&temp_path, json)?;
        if let Err(e) = std::fs::rename(&temp_path, &final_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(())
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(format!("{}.json", key.as_str()))
    }
}
