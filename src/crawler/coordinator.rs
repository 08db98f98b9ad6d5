//! Crawl coordinator
//!
//! Drives the whole crawl: walks the configured countries and universities in
//! order, runs the University extractor first and the six dependent
//! extractors on a small worker pool, accumulates the records, takes partial
//! snapshots, and persists the final tables.

use crate::config::{Config, CountryEntry, UniversityEntry};
use crate::crawler::delay::{DelayPolicy, RandomJitter};
use crate::crawler::fetcher::{FetchStats, Fetcher};
use crate::crawler::render::{ChromeRenderer, Renderer};
use crate::extract::{
    admission, cost, lab, outcome, placeholders, program, scholarship, university, ExtractEnv,
    ReferenceTables, UniversityContext, UniversityTarget,
};
use crate::output::{ReferenceLog, RunStats};
use crate::records::{
    Admission, CostOfLiving, Lab, Outcome, Program, Scholarship, Tables, UniversityBundle,
};
use crate::state::{Checkpoint, CheckpointStore};
use crate::storage::{partial_path, persist_with_backup, SqliteSnapshot, TableSink};
use crate::url::normalize_url;
use crate::{DossierError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// The extractors that run once a university has its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentExtractor {
    Program,
    Lab,
    Scholarship,
    Admission,
    Cost,
    Outcome,
}

impl DependentExtractor {
    pub const ALL: [DependentExtractor; 6] = [
        Self::Program,
        Self::Lab,
        Self::Scholarship,
        Self::Admission,
        Self::Cost,
        Self::Outcome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Lab => "lab",
            Self::Scholarship => "scholarship",
            Self::Admission => "admission",
            Self::Cost => "cost-of-living",
            Self::Outcome => "outcome",
        }
    }

    async fn run(self, env: &ExtractEnv, ctx: &UniversityContext) -> Extracted {
        match self {
            Self::Program => Extracted::Programs(program::extract(env, ctx).await),
            Self::Lab => Extracted::Labs(lab::extract(env, ctx).await),
            Self::Scholarship => Extracted::Scholarships(scholarship::extract(env, ctx).await),
            Self::Admission => Extracted::Admission(admission::extract(env, ctx).await),
            Self::Cost => Extracted::Cost(cost::extract(env, ctx).await),
            Self::Outcome => Extracted::Outcome(outcome::extract(env, ctx).await),
        }
    }

    /// Placeholder output used when the extractor itself failed
    pub fn fallback(self, env: &ExtractEnv, ctx: &UniversityContext) -> Extracted {
        match self {
            Self::Program => Extracted::Programs(program::fallback(env, ctx)),
            Self::Lab => Extracted::Labs(lab::fallback(ctx)),
            Self::Scholarship => Extracted::Scholarships(scholarship::fallback(ctx)),
            Self::Admission => Extracted::Admission(admission::fallback(ctx)),
            Self::Cost => Extracted::Cost(cost::fallback(env, ctx)),
            Self::Outcome => Extracted::Outcome(outcome::fallback(env, ctx)),
        }
    }
}

/// Output of one dependent extractor
#[derive(Debug, Clone)]
pub enum Extracted {
    Programs(Vec<Program>),
    Labs(Vec<Lab>),
    Scholarships(Vec<Scholarship>),
    Admission(Admission),
    Cost(CostOfLiving),
    Outcome(Outcome),
}

impl Extracted {
    fn store(self, bundle: &mut UniversityBundle) {
        match self {
            Self::Programs(records) => bundle.programs = records,
            Self::Labs(records) => bundle.labs = records,
            Self::Scholarships(records) => bundle.scholarships = records,
            Self::Admission(record) => bundle.admission = record,
            Self::Cost(record) => bundle.cost = record,
            Self::Outcome(record) => bundle.outcome = record,
        }
    }
}

/// Where a crawl starts in the configured target list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResumePoint {
    pub country_index: usize,
    pub university_index: usize,
}

impl ResumePoint {
    /// Locates a checkpoint in the configured countries
    ///
    /// A checkpoint naming a country or index that is no longer configured
    /// restarts the crawl from the beginning.
    pub fn locate(checkpoint: &Checkpoint, countries: &[CountryEntry]) -> Option<Self> {
        let country_index = countries.iter().position(|c| c.name == checkpoint.country)?;
        (checkpoint.university_index < countries[country_index].universities.len()).then_some(
            Self {
                country_index,
                university_index: checkpoint.university_index,
            },
        )
    }

    fn is_before(&self, country_index: usize, university_index: usize) -> bool {
        (country_index, university_index) < (self.country_index, self.university_index)
    }
}

/// Main crawl coordinator
///
/// Universities are processed strictly one after another; only the dependent
/// extractors of a single university run concurrently.
pub struct Coordinator {
    config: Config,
    env: ExtractEnv,
    checkpoints: CheckpointStore,
    resume: Option<Checkpoint>,
    sink: Arc<dyn TableSink>,
    tables: Tables,
    stats: RunStats,
}

impl Coordinator {
    /// Creates a coordinator using headless Chrome and randomized pacing
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `fresh` - Discard any checkpoint and start from the first university
    pub fn from_config(config: Config, fresh: bool) -> Result<Self> {
        let renderer = Arc::new(ChromeRenderer::from_config(&config.browser, &config.crawler));
        let delay = Arc::new(RandomJitter::from_config(&config.crawler));
        Self::new(config, renderer, delay, fresh)
    }

    /// Creates a coordinator with explicit rendering and pacing seams
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `renderer` - Renderer used for dynamic or blocked pages
    /// * `delay` - Jitter and backoff policy
    /// * `fresh` - Discard any checkpoint and start from the first university
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(DossierError)` - The HTTP client or the reference log could not be set up
    pub fn new(
        config: Config,
        renderer: Arc<dyn Renderer>,
        delay: Arc<dyn DelayPolicy>,
        fresh: bool,
    ) -> Result<Self> {
        let checkpoints = CheckpointStore::new(&config.output.checkpoint_path);
        if fresh {
            checkpoints.clear()?;
        }
        let resume = checkpoints.load();

        let references = match &resume {
            Some(checkpoint) => {
                tracing::info!(
                    "Found checkpoint from {}: {} (#{}) in {}",
                    checkpoint.timestamp,
                    checkpoint.university,
                    checkpoint.university_index,
                    checkpoint.country
                );
                ReferenceLog::open(&config.output.references_path)?
            }
            None => ReferenceLog::create(&config.output.references_path)?,
        };

        let fetcher = Fetcher::from_config(&config, renderer, delay)?;
        let env = ExtractEnv::new(
            Arc::new(fetcher),
            Arc::new(references),
            Arc::new(ReferenceTables::builtin()),
            Arc::new(config.sources.clone()),
        );

        Ok(Self {
            config,
            env,
            checkpoints,
            resume,
            sink: Arc::new(SqliteSnapshot::new()),
            tables: Tables::default(),
            stats: RunStats::new(),
        })
    }

    /// Replaces the snapshot sink
    pub fn with_sink(mut self, sink: Arc<dyn TableSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the built-in country and scholarship tables
    pub fn with_reference_tables(mut self, tables: ReferenceTables) -> Self {
        self.env.tables = Arc::new(tables);
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn fetch_stats(&self) -> FetchStats {
        self.env.fetcher.stats()
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the final tables were written (the configured
    ///   database or, if that failed, a backup file)
    /// * `Err(DossierError)` - The tables could not be persisted anywhere
    pub async fn run(&mut self) -> Result<PathBuf> {
        let start_time = Instant::now();
        let countries = self.config.countries.clone();

        let resume_point = self.resume.as_ref().and_then(|checkpoint| {
            let point = ResumePoint::locate(checkpoint, &countries);
            if point.is_none() {
                tracing::warn!(
                    "Checkpoint for {} in {} does not match the configured targets, starting over",
                    checkpoint.university,
                    checkpoint.country
                );
            }
            point
        });

        tracing::info!(
            "Starting crawl of {} universities in {} countries",
            self.config.university_count(),
            countries.len()
        );

        for (country_index, country) in countries.iter().enumerate() {
            tracing::info!("Processing country: {}", country.name);

            for (university_index, entry) in country.universities.iter().enumerate() {
                if resume_point.is_some_and(|p| p.is_before(country_index, university_index)) {
                    self.stats.skipped += 1;
                    continue;
                }

                if let Err(e) = self.checkpoints.save(&country.name, university_index, &entry.name) {
                    tracing::warn!("Failed to save checkpoint: {}", e);
                }

                match self.process_entry(&country.name, entry).await {
                    Ok(bundle) => {
                        self.stats.record_bundle(&bundle);
                        self.tables.append(bundle);
                    }
                    Err(e) => {
                        self.stats.failed += 1;
                        tracing::error!("Failed to process {}: {}", entry.name, e);
                        continue;
                    }
                }

                tracing::info!(
                    "Progress: {} universities processed, {} failed",
                    self.stats.processed,
                    self.stats.failed
                );

                let every = self.config.crawler.snapshot_every.max(1);
                if self.stats.processed % every == 0 {
                    self.save_partial(&country.name, university_index + 1);
                }
            }
        }

        let path = self.persist()?;

        if let Err(e) = self.checkpoints.clear() {
            tracing::warn!("Failed to remove checkpoint: {}", e);
        }

        tracing::info!(
            "Crawl completed: {} universities processed, {} failed in {:?}",
            self.stats.processed,
            self.stats.failed,
            start_time.elapsed()
        );

        Ok(path)
    }

    /// Builds the target for a configured university and processes it
    async fn process_entry(&self, country: &str, entry: &UniversityEntry) -> Result<UniversityBundle> {
        let target = UniversityTarget {
            name: entry.name.clone(),
            city: entry.city.clone(),
            country: country.to_string(),
            base_url: normalize_url(&entry.url)?,
        };
        Ok(self.process_university(&target).await)
    }

    /// Extracts every record for one university
    ///
    /// The University extractor runs first since its identifier keys every
    /// other record. A dependent extractor that fails is replaced by its
    /// fallback output; the university is never abandoned over it.
    pub async fn process_university(&self, target: &UniversityTarget) -> UniversityBundle {
        tracing::info!("Processing university: {}", target.name);

        let university = university::extract(&self.env, target).await;
        let ctx = UniversityContext::new(target, university.univ_id.clone());

        let (mut bundle, failures) = run_dependents(&self.env, &ctx, self.config.crawler.workers).await;
        if failures > 0 {
            tracing::warn!("{} extractors fell back for {}", failures, target.name);
        }

        let (notes, timelines) = placeholders::for_university(&ctx, &bundle.programs);
        bundle.university = university;
        bundle.notes = notes;
        bundle.timelines = timelines;
        bundle
    }

    /// Writes a partial snapshot; failures are only logged
    fn save_partial(&mut self, country: &str, position: usize) {
        let path = partial_path(
            Path::new(&self.config.output.partial_directory),
            country,
            position,
        );
        match self.sink.write(&self.tables, &path) {
            Ok(()) => {
                self.stats.snapshots += 1;
                tracing::info!("Saved partial snapshot to {}", path.display());
            }
            Err(e) => tracing::warn!("Failed to save partial snapshot {}: {}", path.display(), e),
        }
    }

    /// Writes the final tables, falling back to a backup file
    fn persist(&self) -> Result<PathBuf> {
        let database_path = PathBuf::from(&self.config.output.database_path);
        match persist_with_backup(self.sink.as_ref(), &self.tables, &database_path) {
            Ok(path) => {
                tracing::info!("Saved tables to {}", path.display());
                Ok(path)
            }
            Err(e) => {
                tracing::error!("CRITICAL: tables could not be saved: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Runs the dependent extractors on a bounded worker pool
///
/// # Returns
///
/// A bundle holding every dependent record, and the number of extractors
/// whose fallback had to be substituted
pub async fn run_dependents(
    env: &ExtractEnv,
    ctx: &UniversityContext,
    workers: usize,
) -> (UniversityBundle, usize) {
    let permits = Arc::new(Semaphore::new(workers.max(1)));

    let handles: Vec<_> = DependentExtractor::ALL
        .into_iter()
        .map(|extractor| {
            let env = env.clone();
            let ctx = ctx.clone();
            let permits = Arc::clone(&permits);
            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                extractor.run(&env, &ctx).await
            });
            (extractor, handle)
        })
        .collect();

    collect_dependents(env, ctx, handles).await
}

/// Awaits the extractor tasks in order, substituting the fallback of any
/// task that panicked or was cancelled
async fn collect_dependents(
    env: &ExtractEnv,
    ctx: &UniversityContext,
    handles: Vec<(DependentExtractor, JoinHandle<Extracted>)>,
) -> (UniversityBundle, usize) {
    let mut bundle = UniversityBundle::default();
    let mut failures = 0;
    for (extractor, handle) in handles {
        let extracted = match handle.await {
            Ok(extracted) => extracted,
            Err(e) => {
                failures += 1;
                let error = DossierError::Extraction {
                    extractor: extractor.name(),
                    university: ctx.name.clone(),
                    message: e.to_string(),
                };
                tracing::warn!("{}; using fallback records", error);
                extractor.fallback(env, ctx)
            }
        };
        extracted.store(&mut bundle);
    }

    (bundle, failures)
}
