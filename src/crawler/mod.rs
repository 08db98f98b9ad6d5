//! Crawler module for document retrieval and crawl coordination
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with caching, pacing and retry logic
//! - Headless rendering for dynamic or blocking sites
//! - HTML page analysis shared by the extractors
//! - Overall crawl coordination

mod coordinator;
mod delay;
mod fetcher;
pub mod parser;
mod render;

pub use coordinator::{run_dependents, Coordinator, DependentExtractor, Extracted, ResumePoint};
pub use delay::{DelayPolicy, NoDelay, RandomJitter};
pub use fetcher::{build_http_client, random_user_agent, Document, FetchError, FetchRequest, FetchStats, Fetcher};
pub use parser::{Heading, Link, Page};
pub use render::{ChromeRenderer, RenderError, Renderer};

use crate::config::Config;
use crate::Result;
use std::path::PathBuf;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resume from the checkpoint, unless `fresh` is set
/// 2. Extract every configured university in order
/// 3. Save partial snapshots along the way
/// 4. Write the final tables and remove the checkpoint
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `fresh` - Ignore and delete any existing checkpoint
///
/// # Returns
///
/// * `Ok(PathBuf)` - Where the final tables were written
/// * `Err(DossierError)` - The crawl could not start or its output could not be saved
pub async fn crawl(config: Config, fresh: bool) -> Result<PathBuf> {
    let mut coordinator = Coordinator::from_config(config, fresh)?;
    coordinator.run().await
}
