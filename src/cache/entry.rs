//! Cached document entries and their freshness checks

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Deterministic key for one fetch request
///
/// The same URL fetched statically and through the renderer, or rendered
/// while waiting on different selectors, produces different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from the normalized URL, the fetch mode and the wait selector
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized URL string
    /// * `rendered` - Whether the document is produced by the renderer
    /// * `selector` - Optional CSS selector the renderer waits for
    pub fn new(url: &str, rendered: bool, selector: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update([0x1f]);
        hasher.update(if rendered { b"rendered" as &[u8] } else { b"static" });
        hasher.update([0x1f]);
        hasher.update(selector.unwrap_or_default().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the hex digest used as the entry's file stem
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A document stored in the content cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDocument {
    /// URL the document was retrieved from
    pub url: String,

    /// Whether the document came from the renderer
    pub rendered: bool,

    /// The retrieved markup
    pub body: String,

    /// When the document was retrieved
    pub fetched_at: DateTime<Utc>,
}

impl CachedDocument {
    /// Creates a new entry stamped with the current time
    pub fn new(url: impl Into<String>, rendered: bool, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            rendered,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Checks whether the entry is older than the freshness window
    ///
    /// # Arguments
    ///
    /// * `freshness` - The freshness window
    ///
    /// # Returns
    ///
    /// * `true` - If the entry must be refetched
    /// * `false` - If the entry can still be served
    pub fn is_stale(&self, freshness: Duration) -> bool {
        self.age() > freshness
    }

    /// Returns how long ago the document was retrieved
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        let a = CacheKey::new("https://example.edu/", false, None);
        let b = CacheKey::new("https://example.edu/", false, None);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_key_separates_mode_and_selector() {
        let plain = CacheKey::new("https://example.edu/", false, None);
        let rendered = CacheKey::new("https://example.edu/", true, None);
        let waited = CacheKey::new("https://example.edu/", true, Some(".lab"));
        assert_ne!(plain, rendered);
        assert_ne!(rendered, waited);
    }

    #[test]
    fn test_new_entry_not_stale() {
        let entry = CachedDocument::new("https://example.edu/", false, "<html></html>");
        assert!(!entry.is_stale(Duration::days(7)));
    }

    #[test]
    fn test_entry_stale_after_window() {
        let mut entry = CachedDocument::new("https://example.edu/", false, "<html></html>");
        entry.fetched_at = Utc::now() - Duration::days(8);
        assert!(entry.is_stale(Duration::days(7)));
    }

    #[test]
    fn test_entry_fresh_at_six_days() {
        let mut entry = CachedDocument::new("https://example.edu/", false, "<html></html>");
        entry.fetched_at = Utc::now() - Duration::days(6);
        assert!(!entry.is_stale(Duration::days(7)));
    }
}
