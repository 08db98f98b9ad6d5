//! Document fetcher
//!
//! This module handles every network retrieval for the extractors, including:
//! - Content cache lookups and population
//! - Static HTTP GETs with a rotated browser identity
//! - Jittered pacing and exponential-backoff retry of transient failures
//! - Escalation to the headless renderer on 403/429 responses
//! - Error classification into [`FetchError`]

use crate::cache::{CacheKey, ContentCache};
use crate::config::Config;
use crate::crawler::delay::DelayPolicy;
use crate::crawler::render::Renderer;
use crate::url::normalize_url;
use chrono::Duration as ChronoDuration;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Desktop browser identities rotated across requests
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Picks a browser identity at random
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// A retrieved document
#[derive(Debug, Clone)]
pub struct Document {
    /// Normalized URL the document was requested from
    pub url: String,

    /// Raw markup
    pub body: String,

    /// Whether the markup came from the renderer
    pub rendered: bool,

    /// Whether the document was served from the content cache
    pub from_cache: bool,
}

/// Reasons a fetch produced no document
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Invalid URL {0}")]
    InvalidUrl(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Blocked with HTTP {status} at {url}")]
    Blocked { url: String, status: u16 },

    #[error("Rendering failed for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Gave up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },
}

/// One fetch request
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub url: &'a str,
    pub render: bool,
    pub wait_selector: Option<&'a str>,
    pub refresh: bool,
}

impl<'a> FetchRequest<'a> {
    /// A static fetch of `url`
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            render: false,
            wait_selector: None,
            refresh: false,
        }
    }

    /// Fetch through the renderer
    pub fn rendered(mut self) -> Self {
        self.render = true;
        self
    }

    /// Fetch through the renderer, waiting for `selector`
    pub fn waiting_for(mut self, selector: &'a str) -> Self {
        self.render = true;
        self.wait_selector = Some(selector);
        self
    }

    /// Ignore any cached copy
    pub fn refresh(mut self) -> Self {
        self.refresh = true;
        self
    }
}

/// Counters describing fetcher activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub http_requests: u64,
    pub renders: u64,
    pub cache_hits: u64,
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    http_requests: AtomicU64,
    renders: AtomicU64,
    cache_hits: AtomicU64,
    failures: AtomicU64,
}

/// Outcome of one static HTTP attempt
enum Attempt {
    Body(String),
    Blocked(u16),
    Status(u16),
    Transient(String),
}

/// Fetches documents through the cache, the HTTP client and the renderer
pub struct Fetcher {
    client: Client,
    cache: ContentCache,
    renderer: Arc<dyn Renderer>,
    delay: Arc<dyn DelayPolicy>,
    retry_attempts: u32,
    counters: Counters,
}

/// Builds the HTTP client used for static fetches
///
/// Certificate validation is disabled: many university sites serve broken
/// chains and reachability matters more here than strict TLS.
///
/// # Arguments
///
/// * `timeout` - Timeout for one request attempt
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the browser-like headers sent with a static request
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

impl Fetcher {
    pub fn new(
        client: Client,
        cache: ContentCache,
        renderer: Arc<dyn Renderer>,
        delay: Arc<dyn DelayPolicy>,
        retry_attempts: u32,
    ) -> Self {
        Self {
            client,
            cache,
            renderer,
            delay,
            retry_attempts: retry_attempts.max(1),
            counters: Counters::default(),
        }
    }

    /// Builds a fetcher from configuration with the given renderer and pacing
    pub fn from_config(
        config: &Config,
        renderer: Arc<dyn Renderer>,
        delay: Arc<dyn DelayPolicy>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(Duration::from_secs(config.crawler.request_timeout))?;
        let cache = ContentCache::new(
            &config.cache.directory,
            ChronoDuration::days(config.cache.freshness_days),
        );
        Ok(Self::new(
            client,
            cache,
            renderer,
            delay,
            config.crawler.retry_attempts,
        ))
    }

    /// Fetches `url` statically (escalating to the renderer when blocked)
    pub async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        self.fetch_with(FetchRequest::new(url)).await
    }

    /// Fetches `url` through the renderer
    pub async fn fetch_rendered(
        &self,
        url: &str,
        wait_selector: Option<&str>,
    ) -> Result<Document, FetchError> {
        let request = match wait_selector {
            Some(selector) => FetchRequest::new(url).waiting_for(selector),
            None => FetchRequest::new(url).rendered(),
        };
        self.fetch_with(request).await
    }

    /// Executes a fetch request
    ///
    /// # Flow
    ///
    /// 1. Normalize the URL
    /// 2. Serve a fresh cached copy unless `refresh` is set
    /// 3. Static requests: jitter, GET, retry transient failures with
    ///    backoff; 403/429 switches to the renderer for the same URL
    /// 4. Rendered requests: jitter, render, capture whatever is present
    /// 5. Cache every non-empty document retrieved
    pub async fn fetch_with(&self, request: FetchRequest<'_>) -> Result<Document, FetchError> {
        let url = normalize_url(request.url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", request.url, e)))?
            .to_string();

        let result = if request.render {
            self.fetch_via_renderer(&url, request.wait_selector, request.refresh)
                .await
        } else {
            match self.fetch_static(&url, request.refresh).await {
                Err(FetchError::Blocked { status, .. }) => {
                    tracing::info!("{} answered {}, retrying through renderer", url, status);
                    self.fetch_via_renderer(&url, request.wait_selector, request.refresh)
                        .await
                }
                other => other,
            }
        };

        if let Err(e) = &result {
            self.counters.failures.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Fetch failed: {}", e);
        }
        result
    }

    /// Returns a snapshot of the activity counters
    pub fn stats(&self) -> FetchStats {
        FetchStats {
            http_requests: self.counters.http_requests.load(Ordering::Relaxed),
            renders: self.counters.renders.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    fn cached(&self, key: &CacheKey, url: &str) -> Option<Document> {
        let entry = self.cache.get(key)?;
        self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Cache hit for {}", url);
        Some(Document {
            url: url.to_string(),
            body: entry.body,
            rendered: entry.rendered,
            from_cache: true,
        })
    }

    fn remember(&self, key: &CacheKey, url: &str, rendered: bool, body: &str) {
        if let Err(e) = self.cache.put(key, url, rendered, body) {
            tracing::warn!("Could not cache {}: {}", url, e);
        }
    }

    async fn fetch_static(&self, url: &str, refresh: bool) -> Result<Document, FetchError> {
        let key = CacheKey::new(url, false, None);
        if !refresh {
            if let Some(doc) = self.cached(&key, url) {
                return Ok(doc);
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            tokio::time::sleep(self.delay.jitter()).await;

            let last = match self.attempt(url).await {
                Attempt::Body(body) => {
                    self.remember(&key, url, false, &body);
                    return Ok(Document {
                        url: url.to_string(),
                        body,
                        rendered: false,
                        from_cache: false,
                    });
                }
                Attempt::Blocked(status) => {
                    return Err(FetchError::Blocked {
                        url: url.to_string(),
                        status,
                    })
                }
                Attempt::Status(status) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    })
                }
                Attempt::Transient(message) => message,
            };

            if attempt >= self.retry_attempts {
                return Err(FetchError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last,
                });
            }

            let wait = self.delay.backoff(attempt);
            tracing::debug!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                self.retry_attempts,
                url,
                last,
                wait
            );
            tokio::time::sleep(wait).await;
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        self.counters.http_requests.fetch_add(1, Ordering::Relaxed);

        let response = match self.client.get(url).headers(browser_headers()).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Transient("request timeout".to_string()),
            Err(e) if e.is_connect() => return Attempt::Transient("connection failed".to_string()),
            Err(e) => return Attempt::Transient(e.to_string()),
        };

        let status = response.status();
        match status {
            StatusCode::OK => match response.text().await {
                Ok(body) => Attempt::Body(body),
                Err(e) => Attempt::Transient(format!("failed reading body: {}", e)),
            },
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Attempt::Blocked(status.as_u16()),
            s if s.is_server_error() => Attempt::Transient(format!("HTTP {}", s.as_u16())),
            s => Attempt::Status(s.as_u16()),
        }
    }

    async fn fetch_via_renderer(
        &self,
        url: &str,
        wait_selector: Option<&str>,
        refresh: bool,
    ) -> Result<Document, FetchError> {
        let key = CacheKey::new(url, true, wait_selector);
        if !refresh {
            if let Some(doc) = self.cached(&key, url) {
                return Ok(doc);
            }
        }

        tokio::time::sleep(self.delay.jitter()).await;
        self.counters.renders.fetch_add(1, Ordering::Relaxed);

        let body = self
            .renderer
            .render(url, wait_selector)
            .await
            .map_err(|e| FetchError::Render {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        self.remember(&key, url, true, &body);
        Ok(Document {
            url: url.to_string(),
            body,
            rendered: true,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn test_random_user_agent_from_list() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert!(headers.contains_key(USER_AGENT));
        assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), "en-US,en;q=0.5");
        assert_eq!(headers.get("DNT").unwrap(), "1");
    }

    #[test]
    fn test_request_builders() {
        let req = FetchRequest::new("https://example.edu/labs").waiting_for(".lab");
        assert!(req.render);
        assert_eq!(req.wait_selector, Some(".lab"));
        assert!(!req.refresh);
        assert!(FetchRequest::new("x").refresh().refresh);
    }

    // Network behaviour is covered by the wiremock integration tests
}
