//! Headless browser rendering
//!
//! This module provides the [`Renderer`] seam used by the fetcher for pages
//! that need JavaScript or that block plain HTTP clients, and a
//! WebDriver-backed implementation driving headless Chrome.

use crate::config::{BrowserConfig, CrawlerConfig};
use crate::crawler::fetcher::random_user_agent;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;
use thiserror::Error;

/// Interval between readiness polls
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Script hiding the automation flag from page scripts
const HIDE_WEBDRIVER_JS: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Rendering failure
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to start browser session: {0}")]
    Session(String),

    #[error("Failed to load page: {0}")]
    Page(String),
}

/// Produces the DOM of a page after scripts have run
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders `url` and returns the resulting markup
    ///
    /// # Arguments
    ///
    /// * `url` - The page to render
    /// * `wait_selector` - CSS selector to wait for; when absent the renderer
    ///   waits for the document to be ready and then settles
    ///
    /// A wait that times out is not an error: whatever markup is present is
    /// returned.
    async fn render(&self, url: &str, wait_selector: Option<&str>) -> Result<String, RenderError>;
}

/// WebDriver-backed headless Chrome renderer
///
/// Every call opens a fresh browser session and always closes it.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    webdriver_url: String,
    wait_timeout: Duration,
    settle: Duration,
}

impl ChromeRenderer {
    pub fn new(webdriver_url: impl Into<String>, wait_timeout: Duration, settle: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            wait_timeout,
            settle,
        }
    }

    pub fn from_config(browser: &BrowserConfig, crawler: &CrawlerConfig) -> Self {
        Self::new(
            browser.webdriver_url.clone(),
            Duration::from_secs(crawler.render_timeout),
            Duration::from_secs(crawler.render_settle),
        )
    }

    fn capabilities(&self) -> WebDriverResult<ChromeCapabilities> {
        let user_agent = format!("--user-agent={}", random_user_agent());
        let mut caps = DesiredCapabilities::chrome();
        caps.add_chrome_option(
            "args",
            vec![
                "--headless=new",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--window-size=1920,1080",
                "--disable-blink-features=AutomationControlled",
                user_agent.as_str(),
            ],
        )?;
        caps.add_chrome_option("excludeSwitches", vec!["enable-automation"])?;
        caps.add_chrome_option("useAutomationExtension", false)?;
        Ok(caps)
    }

    async fn capture(&self, driver: &WebDriver, url: &str, wait_selector: Option<&str>) -> WebDriverResult<String> {
        driver.goto(url).await?;
        if let Err(e) = driver.execute(HIDE_WEBDRIVER_JS, Vec::new()).await {
            tracing::trace!("Could not mask webdriver flag on {}: {}", url, e);
        }

        match wait_selector {
            Some(selector) => {
                if !self.wait_for_selector(driver, selector).await {
                    tracing::warn!(
                        "Timed out waiting for '{}' on {}, capturing page as is",
                        selector,
                        url
                    );
                }
            }
            None => {
                if !self.wait_for_ready(driver).await {
                    tracing::warn!("Timed out waiting for {} to load, capturing page as is", url);
                }
                tokio::time::sleep(self.settle).await;
            }
        }

        driver.source().await
    }

    async fn wait_for_selector(&self, driver: &WebDriver, selector: &str) -> bool {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            if let Ok(found) = driver.find_all(By::Css(selector)).await {
                if !found.is_empty() {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_ready(&self, driver: &WebDriver) -> bool {
        let deadline = Instant::now() + self.wait_timeout;
        loop {
            if let Ok(ret) = driver.execute("return document.readyState", Vec::new()).await {
                if ret.json().as_str() == Some("complete") {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&self, url: &str, wait_selector: Option<&str>) -> Result<String, RenderError> {
        let caps = self
            .capabilities()
            .map_err(|e| RenderError::Session(e.to_string()))?;
        let driver = WebDriver::new(&self.webdriver_url, caps)
            .await
            .map_err(|e| RenderError::Session(e.to_string()))?;

        let result = self.capture(&driver, url, wait_selector).await;

        if let Err(e) = driver.quit().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }

        result.map_err(|e| RenderError::Page(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let renderer = ChromeRenderer::from_config(&BrowserConfig::default(), &CrawlerConfig::default());
        assert_eq!(renderer.webdriver_url, "http://localhost:9515");
        assert_eq!(renderer.wait_timeout, Duration::from_secs(20));
        assert_eq!(renderer.settle, Duration::from_secs(5));
    }

    #[test]
    fn test_capabilities_build() {
        let renderer = ChromeRenderer::new("http://localhost:9515", Duration::from_secs(1), Duration::ZERO);
        assert!(renderer.capabilities().is_ok());
    }
}
