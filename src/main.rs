//! Uni-Dossier main entry point
//!
//! This is the command-line interface for the Uni-Dossier graduate-program
//! dossier builder.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use uni_dossier::config::{load_config_with_hash, Config};
use uni_dossier::crawler::Coordinator;
use uni_dossier::output::{print_run_statistics, print_table_counts};
use uni_dossier::storage::{SqliteSnapshot, TableSink};
use uni_dossier::url::normalize_url;

/// Uni-Dossier: a best-effort graduate-program dossier builder
///
/// Uni-Dossier visits the websites of the configured universities and fills
/// tables of universities, programs, labs, scholarships, admission
/// requirements, cost of living and graduate outcomes.
#[derive(Parser, Debug)]
#[command(name = "uni-dossier")]
#[command(version = "1.0.0")]
#[command(about = "A best-effort graduate-program dossier builder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume from the last checkpoint (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start from the first university, deleting any checkpoint
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and list the targets without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show row counts of the output database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, cli.fresh && !cli.resume).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("uni_dossier=info,warn"),
            1 => EnvFilter::new("uni_dossier=debug,info"),
            2 => EnvFilter::new("uni_dossier=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the settings and every target
fn handle_dry_run(config: &Config) {
    println!("=== Uni-Dossier Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Retry attempts: {}", config.crawler.retry_attempts);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!(
        "  Render timeout: {}s (settle {}s)",
        config.crawler.render_timeout, config.crawler.render_settle
    );
    println!(
        "  Jitter: {}-{}ms",
        config.crawler.min_jitter_ms, config.crawler.max_jitter_ms
    );
    println!("  Snapshot every: {} universities", config.crawler.snapshot_every);

    println!("\nCache:");
    println!("  Directory: {}", config.cache.directory);
    println!("  Freshness: {} days", config.cache.freshness_days);

    println!("\nBrowser:");
    println!("  WebDriver: {}", config.browser.webdriver_url);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  References: {}", config.output.references_path);
    println!("  Checkpoint: {}", config.output.checkpoint_path);
    println!("  Partial snapshots: {}", config.output.partial_directory);

    println!("\nTargets ({} countries):", config.countries.len());
    for country in &config.countries {
        println!("  - {} ({} universities)", country.name, country.universities.len());
        for university in &country.universities {
            let url = normalize_url(&university.url)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| university.url.clone());
            println!("    * {} ({}): {}", university.name, university.city, url);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would process {} universities", config.university_count());
}

/// Handles the --stats mode: shows row counts from the output database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.database_path);
    println!("Database: {}\n", path.display());

    let counts = SqliteSnapshot::new()
        .counts(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    print_table_counts(&counts);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring any checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume from a checkpoint if one exists)");
    }

    tracing::info!(
        "Countries: {}, universities: {}",
        config.countries.len(),
        config.university_count()
    );

    let start_time = Instant::now();
    let mut coordinator = Coordinator::from_config(config, fresh)?;

    let path = match coordinator.run().await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let fetches = coordinator.fetch_stats();
    tracing::info!(
        "Fetcher: {} requests, {} renders, {} cache hits, {} failures",
        fetches.http_requests,
        fetches.renders,
        fetches.cache_hits,
        fetches.failures
    );

    let counts: Vec<(String, usize)> = coordinator
        .tables()
        .counts()
        .into_iter()
        .map(|(sheet, n)| (sheet.to_string(), n))
        .collect();
    println!("Tables written to {}\n", path.display());
    print_table_counts(&counts);
    print_run_statistics(coordinator.stats(), start_time.elapsed());

    Ok(())
}
