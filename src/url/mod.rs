//! URL handling module for Uni-Dossier
//!
//! This module provides URL normalization, candidate-path joining and the
//! deduplication key used when following discovered links.

mod normalize;

use url::Url;

pub use normalize::{dedupe_key, normalize_url};

/// Joins a candidate path onto a university's base URL
///
/// Paths are relative to the base, so `"/admissions"` on
/// `https://example.edu/en` yields `https://example.edu/en/admissions`.
///
/// # Arguments
///
/// * `base` - The university's base URL
/// * `path` - The candidate path (with or without a leading slash)
///
/// # Returns
///
/// The joined URL, or `None` if the result cannot be parsed
pub fn join_path(base: &Url, path: &str) -> Option<Url> {
    let prefix = base.path().trim_end_matches('/');
    let relative = path.trim_start_matches('/');
    let mut root = base.clone();
    root.set_query(None);
    root.set_fragment(None);
    root.join(&format!("{}/{}", prefix, relative)).ok()
}

/// Resolves an `href` found on a page into an absolute HTTP(S) URL
///
/// Anchors, `mailto:`, `javascript:` and `tel:` links are ignored.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("javascript:")
        || href.starts_with("tel:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Returns the host of a URL without a leading `www.`
pub fn bare_host(url: &Url) -> String {
    url.host_str()
        .unwrap_or_default()
        .trim_start_matches("www.")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_at_site_root() {
        let base = Url::parse("https://example.edu/").unwrap();
        let joined = join_path(&base, "/admissions").unwrap();
        assert_eq!(joined.as_str(), "https://example.edu/admissions");
    }

    #[test]
    fn test_join_path_keeps_base_prefix() {
        let base = Url::parse("https://example.edu/en").unwrap();
        let joined = join_path(&base, "/admissions").unwrap();
        assert_eq!(joined.as_str(), "https://example.edu/en/admissions");

        let base = Url::parse("https://example.edu/en/?lang=1").unwrap();
        let joined = join_path(&base, "research/labs").unwrap();
        assert_eq!(joined.as_str(), "https://example.edu/en/research/labs");
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.edu/research/").unwrap();
        let resolved = resolve_link(&base, "labs/ai#team").unwrap();
        assert_eq!(resolved.as_str(), "https://example.edu/research/labs/ai");
    }

    #[test]
    fn test_resolve_skips_non_http_links() {
        let base = Url::parse("https://example.edu/").unwrap();
        assert!(resolve_link(&base, "mailto:info@example.edu").is_none());
        assert!(resolve_link(&base, "javascript:void(0)").is_none());
        assert!(resolve_link(&base, "#top").is_none());
        assert!(resolve_link(&base, "ftp://example.edu/file").is_none());
    }

    #[test]
    fn test_bare_host() {
        let url = Url::parse("https://www.Example.edu/").unwrap();
        assert_eq!(bare_host(&url), "example.edu");
    }
}
