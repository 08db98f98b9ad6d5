use serde::Deserialize;

/// Main configuration structure for Uni-Dossier
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "country", default)]
    pub countries: Vec<CountryEntry>,
}

impl Config {
    /// Total number of target universities across all countries
    pub fn university_count(&self) -> usize {
        self.countries.iter().map(|c| c.universities.len()).sum()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Size of the per-university extractor worker pool
    pub workers: usize,

    /// Maximum attempts per fetch on transient network failures
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Timeout for one static HTTP attempt (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Timeout for renderer waits (seconds)
    #[serde(rename = "render-timeout")]
    pub render_timeout: u64,

    /// Settle delay after the document is ready (seconds)
    #[serde(rename = "render-settle")]
    pub render_settle: u64,

    /// Lower bound of the pre-fetch jitter (milliseconds)
    #[serde(rename = "min-jitter-ms")]
    pub min_jitter_ms: u64,

    /// Upper bound of the pre-fetch jitter (milliseconds)
    #[serde(rename = "max-jitter-ms")]
    pub max_jitter_ms: u64,

    /// Persist a partial snapshot after this many universities
    #[serde(rename = "snapshot-every")]
    pub snapshot_every: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            retry_attempts: 3,
            request_timeout: 30,
            render_timeout: 20,
            render_settle: 5,
            min_jitter_ms: 1000,
            max_jitter_ms: 5000,
            snapshot_every: 5,
        }
    }
}

/// Content cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one file per cached document
    pub directory: String,

    /// Entries older than this many days are refetched
    #[serde(rename = "freshness-days")]
    pub freshness_days: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: "cache".to_string(),
            freshness_days: 7,
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver endpoint (e.g. a running chromedriver)
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
        }
    }
}

/// Third-party data sources consulted besides university sites
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Base of per-university ranking pages; the university slug is appended
    #[serde(rename = "ranking-url")]
    pub ranking_url: String,

    /// Base of per-city cost-of-living pages; the city name is appended
    #[serde(rename = "cost-of-living-url")]
    pub cost_of_living_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            ranking_url: "https://www.topuniversities.com/universities".to_string(),
            cost_of_living_url: "https://www.numbeo.com/cost-of-living/in".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the final tables database
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the consulted-references log
    #[serde(rename = "references-path")]
    pub references_path: String,

    /// Path to the resume checkpoint
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Directory for periodic partial snapshots
    #[serde(rename = "partial-directory")]
    pub partial_directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "dossier.db".to_string(),
            references_path: "references.md".to_string(),
            checkpoint_path: "checkpoint.json".to_string(),
            partial_directory: "partials".to_string(),
        }
    }
}

/// A target country and its universities
#[derive(Debug, Clone, Deserialize)]
pub struct CountryEntry {
    /// Country name, as used by the reference tables (e.g. "España")
    pub name: String,

    #[serde(rename = "university", default)]
    pub universities: Vec<UniversityEntry>,
}

/// A target university
#[derive(Debug, Clone, Deserialize)]
pub struct UniversityEntry {
    pub name: String,
    pub city: String,
    pub url: String,
}
