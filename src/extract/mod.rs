//! Field extractors
//!
//! One module per entity type. Every extractor probes a list of candidate
//! pages under the university's site, mines them with ordered rule tables and
//! falls back to clearly labelled placeholder records when nothing usable is
//! found. Extractors never fail: a page that cannot be fetched or parsed just
//! yields no values.

pub mod admission;
pub mod cost;
pub mod lang;
pub mod lab;
pub mod outcome;
pub mod placeholders;
pub mod program;
pub mod rules;
pub mod scholarship;
pub mod tables;
pub mod university;

use crate::config::SourcesConfig;
use crate::crawler::{Fetcher, Page};
use crate::output::ReferenceLog;
use crate::url::{bare_host, dedupe_key, join_path};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use url::Url;

pub use tables::ReferenceTables;

/// A university as configured
#[derive(Debug, Clone)]
pub struct UniversityTarget {
    pub name: String,
    pub city: String,
    pub country: String,
    pub base_url: Url,
}

/// A university after its identifier has been assigned
#[derive(Debug, Clone)]
pub struct UniversityContext {
    pub name: String,
    pub city: String,
    pub country: String,
    pub base_url: Url,
    pub univ_id: String,
}

impl UniversityContext {
    pub fn new(target: &UniversityTarget, univ_id: impl Into<String>) -> Self {
        Self {
            name: target.name.clone(),
            city: target.city.clone(),
            country: target.country.clone(),
            base_url: target.base_url.clone(),
            univ_id: univ_id.into(),
        }
    }

    /// Host of the base URL without `www.`
    pub fn host(&self) -> String {
        bare_host(&self.base_url)
    }

    /// Base URL without a trailing slash, for building display URLs
    pub fn site(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}

/// Shared services handed to every extractor
#[derive(Clone)]
pub struct ExtractEnv {
    pub fetcher: Arc<Fetcher>,
    pub references: Arc<ReferenceLog>,
    pub tables: Arc<ReferenceTables>,
    pub sources: Arc<SourcesConfig>,
}

impl ExtractEnv {
    pub fn new(
        fetcher: Arc<Fetcher>,
        references: Arc<ReferenceLog>,
        tables: Arc<ReferenceTables>,
        sources: Arc<SourcesConfig>,
    ) -> Self {
        Self {
            fetcher,
            references,
            tables,
            sources,
        }
    }

    /// Fetches and parses `url`; any failure reads as "no page"
    pub async fn page(&self, url: &Url) -> Option<Page> {
        match self.fetcher.fetch(url.as_str()).await {
            Ok(doc) => Page::from_document(&doc),
            Err(e) => {
                tracing::debug!("No page at {}: {}", url, e);
                None
            }
        }
    }

    /// Fetches `url` through the renderer and parses it
    pub async fn rendered_page(&self, url: &Url, wait_selector: Option<&str>) -> Option<Page> {
        match self.fetcher.fetch_rendered(url.as_str(), wait_selector).await {
            Ok(doc) => Page::from_document(&doc),
            Err(e) => {
                tracing::debug!("No rendered page at {}: {}", url, e);
                None
            }
        }
    }

    /// First candidate path under `base` that yields a page
    pub async fn probe_first(&self, base: &Url, paths: &[&str]) -> Option<Page> {
        for path in paths {
            let Some(url) = join_path(base, path) else {
                continue;
            };
            if let Some(page) = self.page(&url).await {
                return Some(page);
            }
        }
        None
    }

    /// Logs a consulted URL for `ctx`
    pub fn cite(&self, ctx: &UniversityContext, purpose: &str, url: &Url) {
        self.references.record(&ctx.name, purpose, url.as_str());
    }
}

/// URLs already visited during one extractor pass
#[derive(Debug, Default)]
pub struct Visited {
    keys: HashSet<String>,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited; `false` if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.keys.insert(dedupe_key(url))
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.keys.contains(&dedupe_key(url))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").ok());

/// First email address in `text`
pub fn find_email(text: &str) -> Option<String> {
    EMAIL
        .as_ref()?
        .find(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Builds the candidate path list for an extractor
///
/// Generic paths come first, then localized guesses for the country's path
/// locale, then international variants.
pub fn candidate_paths(
    generic: &[&'static str],
    localized: &[(tables::PathLocale, &'static [&'static str])],
    locale: Option<tables::PathLocale>,
    international: &[&'static str],
) -> Vec<&'static str> {
    let mut paths: Vec<&'static str> = generic.to_vec();
    if let Some(locale) = locale {
        for (candidate, extra) in localized {
            if *candidate == locale {
                paths.extend_from_slice(extra);
            }
        }
    }
    paths.extend_from_slice(international);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use tables::PathLocale;

    #[test]
    fn test_find_email() {
        assert_eq!(
            find_email("Write to info@example.edu. Thanks").as_deref(),
            Some("info@example.edu")
        );
        assert_eq!(find_email("no address here"), None);
    }

    #[test]
    fn test_visited_dedupes_variants() {
        let mut visited = Visited::new();
        assert!(visited.insert(&Url::parse("https://www.example.edu/labs/").unwrap()));
        assert!(!visited.insert(&Url::parse("https://example.edu/labs").unwrap()));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_candidate_paths_order() {
        let localized: &[(PathLocale, &'static [&'static str])] = &[
            (PathLocale::Spanish, &["/estudios"]),
            (PathLocale::German, &["/studium"]),
        ];
        let paths = candidate_paths(&["/graduate"], localized, Some(PathLocale::Spanish), &["/en/study"]);
        assert_eq!(paths, vec!["/graduate", "/estudios", "/en/study"]);

        let paths = candidate_paths(&["/graduate"], localized, None, &["/en/study"]);
        assert_eq!(paths, vec!["/graduate", "/en/study"]);
    }

    #[test]
    fn test_context_site_and_host() {
        let target = UniversityTarget {
            name: "Example University".to_string(),
            city: "Madrid".to_string(),
            country: "España".to_string(),
            base_url: Url::parse("https://www.example.edu/").unwrap(),
        };
        let ctx = UniversityContext::new(&target, "UNIV00000001");
        assert_eq!(ctx.site(), "https://www.example.edu");
        assert_eq!(ctx.host(), "example.edu");
    }
}
