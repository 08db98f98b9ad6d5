//! Integration tests for the dossier pipeline
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetcher and the full per-university crawl end-to-end, with a zero-delay
//! pacing policy and stub renderers in place of headless Chrome.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use uni_dossier::cache::{CacheKey, CachedDocument, ContentCache};
use uni_dossier::config::{parse_config, Config};
use uni_dossier::crawler::{
    build_http_client, Coordinator, FetchError, Fetcher, NoDelay, RenderError, Renderer,
};
use uni_dossier::extract::program::program_id;
use uni_dossier::extract::university::university_id;
use uni_dossier::records::{generate_id, IdKind, APPROXIMATE_NOTE};
use uni_dossier::state::CheckpointStore;
use uni_dossier::storage::{SqliteSnapshot, TableSink};
use uni_dossier::url::normalize_url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renderer standing in for a browser that cannot be started
struct UnavailableRenderer;

#[async_trait]
impl Renderer for UnavailableRenderer {
    async fn render(&self, _url: &str, _wait_selector: Option<&str>) -> Result<String, RenderError> {
        Err(RenderError::Session("no browser in tests".to_string()))
    }
}

/// Renderer returning fixed markup and counting its calls
struct FixedRenderer {
    body: &'static str,
    calls: AtomicUsize,
}

impl FixedRenderer {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Renderer for FixedRenderer {
    async fn render(&self, _url: &str, _wait_selector: Option<&str>) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.to_string())
    }
}

/// Creates a fetcher caching under `cache_dir`
fn create_fetcher(cache_dir: &Path, renderer: Arc<dyn Renderer>, retry_attempts: u32) -> Fetcher {
    let client = build_http_client(Duration::from_secs(5)).expect("Failed to build client");
    let cache = ContentCache::new(cache_dir, ChronoDuration::days(7));
    Fetcher::new(client, cache, renderer, Arc::new(NoDelay), retry_attempts)
}

/// Creates a test configuration with every path under `dir`
fn create_test_config(dir: &Path, base_url: &str, universities: &[(&str, &str)]) -> Config {
    let mut toml = format!(
        r#"
[crawler]
workers = 2
retry-attempts = 2
request-timeout = 5
min-jitter-ms = 0
max-jitter-ms = 0
snapshot-every = 1

[cache]
directory = "{dir}/cache"

[sources]
ranking-url = "{base}/rankings"
cost-of-living-url = "{base}/cost"

[output]
database-path = "{dir}/out/dossier.db"
references-path = "{dir}/out/references.md"
checkpoint-path = "{dir}/checkpoint.json"
partial-directory = "{dir}/partials"

[[country]]
name = "España"
"#,
        dir = dir.display(),
        base = base_url
    );

    for (name, city) in universities {
        toml.push_str(&format!(
            "\n[[country.university]]\nname = \"{}\"\ncity = \"{}\"\nurl = \"{}\"\n",
            name, city, base_url
        ));
    }

    parse_config(&toml).expect("Test config should be valid")
}

const HOME_PAGE: &str = r#"<html><head><title>Example University</title></head><body>
    <h1>Example University</h1>
    <p>Founded in 1968, Example University welcomes 25,000 students to its urban campus.</p>
    <p>Contact: info@example.edu</p>
    </body></html>"#;

const COST_PAGE: &str = r#"<html><body>
    <div><span>Monthly costs for a single person are 1,048.5€ without rent.</span></div>
    <table>
      <tr><td>Meal, Inexpensive Restaurant</td><td>13.00 €</td></tr>
      <tr><td>Monthly Pass (Regular Price)</td><td>54.60 €</td></tr>
      <tr><td>Apartment (1 bedroom) in City Centre</td><td>1,150.00 €</td></tr>
    </table>
    </body></html>"#;

/// Mounts the pages an end-to-end crawl of one Madrid university reads
async fn mount_site(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(HOME_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cost/Madrid"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(COST_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_cache_hit_skips_network() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>cached body</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(temp_dir.path(), Arc::new(UnavailableRenderer), 3);
    let url = format!("{}/page", mock_server.uri());

    let first = fetcher.fetch(&url).await.expect("First fetch should succeed");
    assert!(!first.from_cache);

    let second = fetcher.fetch(&url).await.expect("Second fetch should succeed");
    assert!(second.from_cache);
    assert_eq!(second.body, first.body);

    let stats = fetcher.stats();
    assert_eq!(stats.http_requests, 1);
    assert_eq!(stats.cache_hits, 1);
}

#[tokio::test]
async fn test_expired_cache_entry_refetched() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/stale"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>fresh body</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = normalize_url(&format!("{}/stale", mock_server.uri()))
        .expect("Mock URL should normalize")
        .to_string();

    // Plant an eight-day-old entry for the same key
    let key = CacheKey::new(&url, false, None);
    let mut entry = CachedDocument::new(&url, false, "<html>old body</html>");
    entry.fetched_at = Utc::now() - ChronoDuration::days(8);
    std::fs::write(
        temp_dir.path().join(format!("{}.json", key.as_str())),
        serde_json::to_string(&entry).expect("Entry should serialize"),
    )
    .expect("Failed to plant cache entry");

    let fetcher = create_fetcher(temp_dir.path(), Arc::new(UnavailableRenderer), 3);
    let doc = fetcher.fetch(&url).await.expect("Fetch should succeed");

    assert!(!doc.from_cache);
    assert_eq!(doc.body, "<html>fresh body</html>");
}

#[tokio::test]
async fn test_blocked_response_escalates_to_renderer() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let renderer = Arc::new(FixedRenderer::new("<html>rendered body</html>"));
    let fetcher = create_fetcher(temp_dir.path(), renderer.clone(), 3);

    let doc = fetcher
        .fetch(&format!("{}/blocked", mock_server.uri()))
        .await
        .expect("Blocked page should be rendered");
    assert!(doc.rendered);
    assert_eq!(doc.body, "<html>rendered body</html>");

    let doc = fetcher
        .fetch(&format!("{}/limited", mock_server.uri()))
        .await
        .expect("Rate-limited page should be rendered");
    assert!(doc.rendered);

    assert_eq!(renderer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_blocked_and_unrenderable_fails() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(temp_dir.path(), Arc::new(UnavailableRenderer), 3);
    let result = fetcher.fetch(&format!("{}/blocked", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Render { .. })));
    assert_eq!(fetcher.stats().renders, 1);
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(temp_dir.path(), Arc::new(UnavailableRenderer), 3);
    let result = fetcher.fetch(&format!("{}/flaky", mock_server.uri())).await;

    match result {
        Err(FetchError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("Expected exhausted retries, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(temp_dir.path(), Arc::new(UnavailableRenderer), 3);
    let result = fetcher.fetch(&format!("{}/missing", mock_server.uri())).await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    assert_eq!(fetcher.stats().renders, 0);
}

#[tokio::test]
async fn test_full_crawl_single_university() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_site(&mock_server).await;

    let config = create_test_config(
        temp_dir.path(),
        &mock_server.uri(),
        &[("Example University", "Madrid")],
    );
    let database_path = config.output.database_path.clone();
    let checkpoint_path = config.output.checkpoint_path.clone();
    let references_path = config.output.references_path.clone();

    let mut coordinator =
        Coordinator::new(config, Arc::new(UnavailableRenderer), Arc::new(NoDelay), false)
            .expect("Failed to create coordinator");
    let written = coordinator.run().await.expect("Crawl should succeed");
    assert_eq!(written, Path::new(&database_path));

    let tables = coordinator.tables();

    // University
    assert_eq!(tables.universities.len(), 1);
    let university = &tables.universities[0];
    assert_eq!(university.country, "España");
    assert_eq!(university.city, "Madrid");
    assert_eq!(university.main_language.as_deref(), Some("Spanish"));
    assert_eq!(university.year_established.as_deref(), Some("1968"));
    assert_eq!(university.univ_id, university_id("Example University"));

    // Every dependent record points at the university
    assert!(!tables.programs.is_empty());
    assert!(tables.programs.iter().all(|p| p.univ_id == university.univ_id));
    assert!(!tables.labs.is_empty());
    assert!(tables.labs.iter().all(|l| l.univ_id == university.univ_id));
    assert!(tables.scholarships.iter().all(|s| s.univ_id == university.univ_id));

    // Nothing is discoverable on the mock site, so sub-entities are placeholders
    assert!(tables.programs.iter().all(|p| p.notes.contains(APPROXIMATE_NOTE)));
    assert!(tables.labs.iter().all(|l| l.notes.contains(APPROXIMATE_NOTE)));

    // Scholarships come from the international catalogue for Spain
    assert!(tables
        .scholarships
        .iter()
        .any(|s| s.name == "Erasmus Mundus Joint Master Degrees"));

    assert_eq!(tables.admissions.len(), 1);
    assert_eq!(tables.outcomes.len(), 1);

    // Cost of living from the mocked city page and the Spain tables
    assert_eq!(tables.costs.len(), 1);
    let cost = &tables.costs[0];
    assert_eq!(cost.city, "Madrid");
    assert_eq!(cost.safety_rating.as_deref(), Some("Average"));
    assert_eq!(cost.monthly_estimate.as_deref(), Some("1,048.5"));
    assert_eq!(cost.housing_costs.as_deref(), Some("1,150.00 €"));

    // One Notes and one Timeline row for the university plus one per program
    assert_eq!(tables.notes.len(), tables.programs.len() + 1);
    assert_eq!(tables.timelines.len(), tables.programs.len() + 1);

    let stats = coordinator.stats();
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.extractor_fallbacks, 0);
    assert_eq!(stats.snapshots, 1);

    // Persisted output
    let counts = SqliteSnapshot::new()
        .counts(Path::new(&database_path))
        .expect("Output database should be readable");
    assert_eq!(counts[0], ("1_University".to_string(), 1));
    assert_eq!(counts[1].1, tables.programs.len());
    assert!(!Path::new(&checkpoint_path).exists());

    let references = std::fs::read_to_string(&references_path).expect("References should exist");
    assert!(references.contains("[Example University – Cost of living in Madrid]"));
    assert!(references.contains("/cost/Madrid"));
}

#[tokio::test]
async fn test_crawl_resumes_from_checkpoint() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_site(&mock_server).await;

    let config = create_test_config(
        temp_dir.path(),
        &mock_server.uri(),
        &[("First University", "Madrid"), ("Second University", "Madrid")],
    );

    CheckpointStore::new(&config.output.checkpoint_path)
        .save("España", 1, "Second University")
        .expect("Failed to save checkpoint");

    let mut coordinator =
        Coordinator::new(config, Arc::new(UnavailableRenderer), Arc::new(NoDelay), false)
            .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl should succeed");

    let names: Vec<_> = coordinator
        .tables()
        .universities
        .iter()
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(names, vec!["Second University"]);
    assert_eq!(coordinator.stats().skipped, 1);
}

#[tokio::test]
async fn test_fresh_crawl_ignores_checkpoint() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_site(&mock_server).await;

    let config = create_test_config(
        temp_dir.path(),
        &mock_server.uri(),
        &[("First University", "Madrid"), ("Second University", "Madrid")],
    );
    let checkpoints = CheckpointStore::new(&config.output.checkpoint_path);
    checkpoints
        .save("España", 1, "Second University")
        .expect("Failed to save checkpoint");

    let mut coordinator =
        Coordinator::new(config, Arc::new(UnavailableRenderer), Arc::new(NoDelay), true)
            .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl should succeed");

    assert_eq!(coordinator.tables().universities.len(), 2);
    assert_eq!(coordinator.stats().skipped, 0);
    assert!(checkpoints.load().is_none());
}

/// University names stored in a snapshot database
fn snapshot_universities(path: &Path) -> Vec<String> {
    let conn = rusqlite::Connection::open(path).expect("Snapshot should open");
    let mut stmt = conn
        .prepare(r#"SELECT "University" FROM "1_University""#)
        .expect("University table should exist");
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .expect("Query should run")
        .collect::<Result<Vec<_>, _>>()
        .expect("Rows should decode");
    names
}

#[tokio::test]
async fn test_resumed_crawl_keeps_earlier_partial_snapshots() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_site(&mock_server).await;

    // First run covers only the first university, as if interrupted after it
    let first_run = create_test_config(
        temp_dir.path(),
        &mock_server.uri(),
        &[("First University", "Madrid")],
    );
    let partials = Path::new(&first_run.output.partial_directory).to_path_buf();
    let mut coordinator =
        Coordinator::new(first_run, Arc::new(UnavailableRenderer), Arc::new(NoDelay), false)
            .expect("Failed to create coordinator");
    coordinator.run().await.expect("First run should succeed");

    let second_run = create_test_config(
        temp_dir.path(),
        &mock_server.uri(),
        &[("First University", "Madrid"), ("Second University", "Madrid")],
    );
    CheckpointStore::new(&second_run.output.checkpoint_path)
        .save("España", 1, "Second University")
        .expect("Failed to save checkpoint");
    let mut coordinator =
        Coordinator::new(second_run, Arc::new(UnavailableRenderer), Arc::new(NoDelay), false)
            .expect("Failed to create coordinator");
    coordinator.run().await.expect("Resumed run should succeed");

    assert_eq!(
        snapshot_universities(&partials.join("partial_España_1.db")),
        vec!["First University"]
    );
    assert_eq!(
        snapshot_universities(&partials.join("partial_España_2.db")),
        vec!["Second University"]
    );
}

#[tokio::test]
async fn test_failed_university_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    mount_site(&mock_server).await;

    let mut config = create_test_config(
        temp_dir.path(),
        &mock_server.uri(),
        &[("Broken University", "Madrid"), ("Second University", "Madrid")],
    );
    config.countries[0].universities[0].url = "ftp://broken.example.edu".to_string();
    let database_path = config.output.database_path.clone();

    let mut coordinator =
        Coordinator::new(config, Arc::new(UnavailableRenderer), Arc::new(NoDelay), false)
            .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl should succeed");

    let stats = coordinator.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.processed, 1);

    assert_eq!(
        snapshot_universities(Path::new(&database_path)),
        vec!["Second University"]
    );
}

#[test]
fn test_checkpoint_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = CheckpointStore::new(temp_dir.path().join("checkpoint.json"));

    store.save("Alemania", 2, "X").expect("Failed to save checkpoint");
    let checkpoint = store.load().expect("Checkpoint should load");

    assert_eq!(checkpoint.country, "Alemania");
    assert_eq!(checkpoint.university_index, 2);
    assert_eq!(checkpoint.university, "X");
}

#[test]
fn test_identifiers_are_deterministic() {
    let a = program_id("MSc Computer Science", "Example University");
    let b = program_id("MSc Computer Science", "Example University");
    let c = program_id("MSc Mathematics", "Example University");
    assert_eq!(a, b);
    assert_ne!(a, c);

    assert_eq!(
        generate_id(IdKind::Lab, &["AI Lab", "Example University"]),
        generate_id(IdKind::Lab, &["AI Lab", "Example University"])
    );
    assert_ne!(
        university_id("Example University"),
        university_id("Other University")
    );
}
