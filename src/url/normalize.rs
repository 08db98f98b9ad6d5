use crate::UrlError;
use url::Url;

/// Normalizes a target URL before it is fetched or used as a cache key
///
/// # Normalization Steps
///
/// 1. Trim whitespace; prepend `https://` when no scheme is present
/// 2. Parse the URL; reject if malformed
/// 3. Reject schemes other than HTTP and HTTPS
/// 4. Lowercase the host (done by the parser) and require one
/// 5. Collapse duplicate slashes and dot segments in the path
/// 6. Remove the fragment
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use uni_dossier::url::normalize_url;
///
/// let url = normalize_url("www.EXAMPLE.edu//admissions#top").unwrap();
/// assert_eq!(url.as_str(), "https://www.example.edu/admissions");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);
    url.set_fragment(None);

    Ok(url)
}

/// Builds the key used to deduplicate discovered sub-pages
///
/// Two links that differ only by scheme, `www.` prefix, trailing slash,
/// letter case or fragment share a key.
pub fn dedupe_key(url: &Url) -> String {
    let host = url
        .host_str()
        .unwrap_or_default()
        .trim_start_matches("www.")
        .to_lowercase();
    let path = url.path().trim_end_matches('/').to_lowercase();
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}{}?{}", host, path, query),
        _ => format!("{}{}", host, path),
    }
}

/// Normalizes a URL path by removing dot segments and duplicate slashes
///
/// A trailing slash is preserved because some university sites serve
/// different pages for `/graduate` and `/graduate/`.
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    let mut result = format!("/{}", normalized_segments.join("/"));
    if path.ends_with('/') {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_missing_scheme() {
        let result = normalize_url("example.edu/programs").unwrap();
        assert_eq!(result.as_str(), "https://example.edu/programs");
    }

    #[test]
    fn test_keeps_http_scheme() {
        let result = normalize_url("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(result.as_str(), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.edu/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.edu/page");
    }

    #[test]
    fn test_lowercase_domain() {
        let result = normalize_url("https://EXAMPLE.EDU/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.edu/Page");
    }

    #[test]
    fn test_multiple_slashes_and_dots() {
        let result = normalize_url("https://example.edu///a/../b/./c").unwrap();
        assert_eq!(result.as_str(), "https://example.edu/b/c");
    }

    #[test]
    fn test_trailing_slash_preserved() {
        let result = normalize_url("https://example.edu/graduate/").unwrap();
        assert_eq!(result.as_str(), "https://example.edu/graduate/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.edu").unwrap();
        assert_eq!(result.as_str(), "https://example.edu/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.edu/page");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_url("http://").is_err());
    }

    #[test]
    fn test_dedupe_key_ignores_cosmetic_differences() {
        let a = Url::parse("https://www.example.edu/Labs/AI/").unwrap();
        let b = Url::parse("http://example.edu/labs/ai#people").unwrap();
        assert_eq!(dedupe_key(&a), dedupe_key(&b));
    }

    #[test]
    fn test_dedupe_key_keeps_query() {
        let a = Url::parse("https://example.edu/search?q=ai").unwrap();
        let b = Url::parse("https://example.edu/search?q=nlp").unwrap();
        assert_ne!(dedupe_key(&a), dedupe_key(&b));
    }
}
