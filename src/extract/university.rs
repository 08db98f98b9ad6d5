//! University profile extraction
//!
//! Runs first for every university: its identifier keys every other record.

use super::rules::{self, contains_any, FieldRules, Transform};
use super::{find_email, ExtractEnv, UniversityTarget};
use crate::crawler::parser::{collapse_whitespace, selector};
use crate::crawler::Page;
use crate::records::{generate_id, IdKind, University, APPROXIMATE_NOTE};
use crate::url::join_path;
use chrono::Datelike;
use regex::Captures;
use scraper::Html;
use std::sync::LazyLock;
use url::Url;

const PUBLIC_TERMS: &[&str] = &["public", "state university", "state-funded"];
const PRIVATE_TERMS: &[&str] = &["private", "independent", "not-for-profit"];

const URBAN_TERMS: &[&str] = &["urban", "city", "metropolitan"];
const SUBURBAN_TERMS: &[&str] = &["suburban", "outskirts", "residential area"];
const RURAL_TERMS: &[&str] = &["rural", "countryside", "remote"];

/// Path fragments of links that lead to an "about" page
const ABOUT_LINK_HINTS: &[&str] = &["about", "overview", "university"];

/// At most this many about-page candidates are fetched
const ABOUT_CANDIDATES: usize = 3;

static YEAR_ESTABLISHED: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)\b(?:founded|established|since)\D{0,40}?(\d{4})\b", plausible_year as Transform),
        (r"(?i)\b(\d{4})\D{0,40}?(?:founded|established)", plausible_year),
    ])
});

static STUDENT_POPULATION: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (
            r"(?i)\b(?:students?|enrollment|population)\D{0,60}?(\d{1,3}(?:,\d{3})+|\d{4,})",
            rules::large_number as Transform,
        ),
        (
            r"(?i)(\d{1,3}(?:,\d{3})+|\d{4,})\s*(?:\w+\s+){0,3}?(?:students?|enrollment)",
            rules::large_number,
        ),
    ])
});

/// Accepts four-digit years between 1000 and the current year
fn plausible_year(caps: &Captures<'_>) -> Option<String> {
    let current = chrono::Utc::now().year();
    rules::first_digits(caps).filter(|y| {
        y.len() == 4 && y.parse::<i32>().is_ok_and(|y| (1000..=current).contains(&y))
    })
}

/// Identifier of a university
pub fn university_id(name: &str) -> String {
    generate_id(IdKind::University, &[name])
}

/// Record with the configured identity and country-table facts
fn base_record(env: &ExtractEnv, target: &UniversityTarget) -> University {
    let profile = env.tables.country(&target.country);
    University {
        univ_id: university_id(&target.name),
        country: target.country.clone(),
        city: target.city.clone(),
        name: target.name.clone(),
        website: target.base_url.to_string(),
        main_language: profile.map(|p| p.main_language.to_string()),
        other_languages: profile.and_then(|p| other_languages(p.main_language)),
        ..Default::default()
    }
}

/// Graduate teaching outside English-speaking countries also runs in English
fn other_languages(main_language: &str) -> Option<String> {
    (!main_language.contains("English")).then(|| "English".to_string())
}

/// The record emitted when the university's site cannot be mined
pub fn fallback(env: &ExtractEnv, target: &UniversityTarget) -> University {
    University {
        notes: APPROXIMATE_NOTE.to_string(),
        ..base_record(env, target)
    }
}

/// Extracts the university profile
///
/// # Arguments
///
/// * `env` - Shared extraction services
/// * `target` - The configured university
///
/// # Returns
///
/// Exactly one record; fields that could not be found stay unset
pub async fn extract(env: &ExtractEnv, target: &UniversityTarget) -> University {
    tracing::info!("Extracting university profile for {}", target.name);

    let Some(home) = env.page(&target.base_url).await else {
        tracing::warn!("Home page of {} unavailable, using fallback profile", target.name);
        return fallback(env, target);
    };

    let mut record = base_record(env, target);
    fill_from_home(&mut record, &home);

    if let Some(url) = ranking_url(&env.sources.ranking_url, &target.name) {
        if let Ok(doc) = env.fetcher.fetch(url.as_str()).await {
            record.ranking_qs = ranking_from_html(&doc.body);
            env.references.record(&target.name, "QS Ranking", url.as_str());
        }
    }

    for link in about_links(&home).into_iter().take(ABOUT_CANDIDATES) {
        if let Some(about) = env.page(&link).await {
            record.kind = classify_type(&about.lower_text()).map(str::to_string);
            env.references.record(&target.name, "About page", link.as_str());
            break;
        }
    }

    let campus = match join_path(&target.base_url, "/campus") {
        Some(url) => env.page(&url).await,
        None => None,
    };
    let campus_text = campus.as_ref().unwrap_or(&home).lower_text();
    record.campus_environment = campus_environment(&campus_text).map(str::to_string);

    env.references
        .record(&target.name, "General information", target.base_url.as_str());

    record
}

/// Fills the facts readable from the home page
pub fn fill_from_home(record: &mut University, home: &Page) {
    record.year_established = YEAR_ESTABLISHED.first(&home.text);
    record.student_population = STUDENT_POPULATION.first(&home.text);
    record.size = record
        .student_population
        .as_deref()
        .and_then(size_bucket)
        .map(str::to_string);
    record.contact_email = find_email(&home.text);
}

/// Public or private, from about-page wording
pub fn classify_type(text_lower: &str) -> Option<&'static str> {
    if contains_any(text_lower, PUBLIC_TERMS) {
        Some("Public")
    } else if contains_any(text_lower, PRIVATE_TERMS) {
        Some("Private")
    } else {
        None
    }
}

/// Size bucket from a student count such as `"45,000"`
pub fn size_bucket(population: &str) -> Option<&'static str> {
    let count: u64 = population.replace(',', "").parse().ok()?;
    Some(if count > 30_000 {
        "Large"
    } else if count > 10_000 {
        "Medium"
    } else {
        "Small"
    })
}

/// Urban, suburban or rural, from campus-page wording
pub fn campus_environment(text_lower: &str) -> Option<&'static str> {
    if contains_any(text_lower, URBAN_TERMS) {
        Some("Urban")
    } else if contains_any(text_lower, SUBURBAN_TERMS) {
        Some("Suburban")
    } else if contains_any(text_lower, RURAL_TERMS) {
        Some("Rural")
    } else {
        None
    }
}

/// Ranking page for a university: `<base>/<lowercased-hyphenated-name>`
pub fn ranking_url(base: &str, name: &str) -> Option<Url> {
    let slug = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    Url::parse(&format!("{}/{}", base.trim_end_matches('/'), slug)).ok()
}

/// Text of the `div.ranking-result` block on a ranking page
pub fn ranking_from_html(html: &str) -> Option<String> {
    let sel = selector("div.ranking-result")?;
    let document = Html::parse_document(html);
    let text = document
        .select(&sel)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))?;
    (!text.is_empty()).then_some(text)
}

/// Links on the home page that look like they lead to an about page
fn about_links(home: &Page) -> Vec<Url> {
    home.links
        .iter()
        .filter(|link| {
            let path = link.url.path().to_lowercase();
            ABOUT_LINK_HINTS.iter().any(|hint| path.contains(hint))
        })
        .map(|link| link.url.clone())
        .collect()
}
