//! Graduate outcome extraction
//!
//! Career and alumni pages are mined for employment figures. Anything the
//! site does not state is filled from country defaults, so the record is
//! always complete enough to compare universities.

use super::rules::{self, truncate, FieldRules, Transform};
use super::tables::{CountryProfile, ReferenceTables};
use super::{ExtractEnv, UniversityContext};
use crate::crawler::Page;
use crate::records::{generate_id, IdKind, Outcome, APPROXIMATE_NOTE};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const CANDIDATE_PATHS: &[&str] = &[
    "/career",
    "/careers",
    "/alumni",
    "/outcomes",
    "/placement",
    "/employment",
    "/graduate-outcomes",
    "/en/careers",
    "/en/alumni",
];

const DEFAULT_EMPLOYABILITY: &str = "90-95%";
const DEFAULT_TIME_TO_JOB: &str = "3-6";
const DEFAULT_CAREER_SERVICES: &str = "Standard career services available";
const DEFAULT_VISA_EXTENSION: &str = "Varies with immigration regulations";

const CAREER_SERVICE_KEYWORDS: &[&str] = &[
    "career counseling",
    "resume review",
    "cv workshop",
    "interview preparation",
    "job fair",
    "career fair",
    "networking event",
    "employer presentation",
];

const SALARY_SYMBOLS: &[(char, &str)] = &[('$', "USD"), ('€', "EUR"), ('£', "GBP"), ('¥', "JPY")];

/// Weeks per month when converting job-search durations
const WEEKS_PER_MONTH: f64 = 4.33;

const EMPLOYERS_MAX_CHARS: usize = 100;

static EMPLOYMENT: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)(\d{1,3})\s?%[^.]{0,80}?(?:employment|employed|job placement|placement rate)", rules::percentage as Transform),
        (r"(?i)(?:employment|employed|job placement|placement rate)[^.]{0,80}?(\d{1,3})\s?%", rules::percentage),
        (r"(?i)(\d{1,3}) percent[^.]{0,80}?(?:employment|employed|job placement)", rules::percentage),
    ])
});

static SALARY: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)(?:average|median) (?:starting|initial) salary[^.]{0,60}?([$€£¥])?\s?(\d{1,3}(?:,\d{3})+|\d{5,})", salary as Transform),
        (r"(?i)([$€£¥])?\s?(\d{1,3}(?:,\d{3})+|\d{5,})[^.]{0,60}?(?:average|median) (?:starting|initial) salary", salary),
        (r"(?i)(?:starting|initial) salary[^.]{0,60}?([$€£¥])?\s?(\d{1,3}(?:,\d{3})+|\d{5,})", salary),
    ])
});

static TIME_TO_JOB: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)\b(\d{1,2})\s+(months?|weeks?)[^.]{0,60}?(?:to secure|to find|first job|employment)", months as Transform),
        (r"(?i)(?:graduates? find|secure)[^.]{0,60}?\b(\d{1,2})\s+(months?|weeks?)", months),
        (r"(?i)(?:time to|time until)[^.]{0,60}?\b(\d{1,2})\s+(months?|weeks?)", months),
    ])
});

static EMPLOYERS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[
            r"(?i)(?:top|notable|main|key) employers?[:\s]+([^.]+)",
            r"(?i)(?:compan(?:y|ies) that hire|firms? that recruit)[:\s]+([^.]+)",
            r"(?i)(?:our graduates? work for|alumni work for)[:\s]+([^.]+)",
        ],
        1,
    )
});

static PARTNERSHIPS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[r"(?i)(?:industry partners(?:hips)?|partnerships? with|partner companies)[:\s]+([^.]+)"],
        1,
    )
});

static INTERNSHIPS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[
            r"(?i)(?:internships?|practical training|co-op)[^.]{0,60}?(?:opportunit|program|available)",
            r"(?i)students? (?:can|have access to)[^.]{0,60}?(?:internships?|practical training|co-op)",
            r"(?i)(?:offers?|provides?)[^.]{0,60}?(?:internships?|practical training|co-op)",
        ],
        0,
    )
});

static ALUMNI_SIZE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)(?:alumni network|network of alumni)[^.]{0,60}?(\d{1,3}(?:,\d{3})+|\d{4,})", alumni_count as Transform),
        (r"(?i)(\d{1,3}(?:,\d{3})+|\d{4,})\+?\s+(?:alumni|graduates)", alumni_count),
        (r"(?i)community of[^.]{0,40}?(\d{1,3}(?:,\d{3})+|\d{4,})[^.]{0,20}?(?:alumni|graduates)", alumni_count),
    ])
});

static ALUMNI_EVENTS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(&[r"(?i)alumni (?:events|gatherings|reunions|meetings|conferences)"], 0)
});

static MENTORSHIP: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)(?:mentorship|mentoring) programs?"], 0));

static FURTHER_STUDY: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)(\d{1,2})\s?%[^.]{0,60}?(?:further study|graduate study|phd|doctoral|advanced degree)", rules::percentage as Transform),
        (r"(?i)(?:further study|graduate study|phd|doctoral|advanced degree)[^.]{0,60}?(\d{1,2})\s?%", rules::percentage),
        (r"(?i)(\d{1,2}) percent[^.]{0,60}?(?:further study|graduate study)", rules::percentage),
    ])
});

/// Salary amount, prefixed with its currency symbol when one was given
fn salary(caps: &Captures<'_>) -> Option<String> {
    let amount = caps.get(2)?.as_str();
    let symbol = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    Some(format!("{}{}", symbol, amount))
}

fn months(caps: &Captures<'_>) -> Option<String> {
    let count: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    if unit.starts_with("week") {
        Some(((count / WEEKS_PER_MONTH).round() as u32).to_string())
    } else {
        Some((count as u32).to_string())
    }
}

fn alumni_count(caps: &Captures<'_>) -> Option<String> {
    rules::large_number(caps).filter(|n| !looks_like_year(n))
}

fn looks_like_year(number: &str) -> bool {
    number.len() == 4 && (number.starts_with("19") || number.starts_with("20"))
}

/// Splits a leading currency symbol off a salary
fn split_currency(salary: &str) -> (String, Option<&'static str>) {
    let mut chars = salary.chars();
    match chars.next() {
        Some(first) => match SALARY_SYMBOLS.iter().find(|(symbol, _)| *symbol == first) {
            Some((_, code)) => (chars.as_str().to_string(), Some(*code)),
            None => (salary.to_string(), None),
        },
        None => (String::new(), None),
    }
}

/// Whether `name` is mentioned in `text_lower`; short names must be whole words
fn mentions(text_lower: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    if name.len() > 3 {
        return text_lower.contains(&name);
    }
    text_lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == name)
}

/// Known employers named in `text`, or the text itself when none are known
pub fn employers(text: &str, known: &[&str]) -> Option<String> {
    let lower = text.to_lowercase();
    let found: Vec<&str> = known
        .iter()
        .copied()
        .filter(|company| mentions(&lower, company))
        .collect();
    if !found.is_empty() {
        Some(found.join(", "))
    } else if text.trim().chars().count() > 5 {
        Some(truncate(text, EMPLOYERS_MAX_CHARS))
    } else {
        None
    }
}

/// Career services named on the page, title-cased
pub fn career_services(text_lower: &str) -> Option<String> {
    let found: Vec<String> = CAREER_SERVICE_KEYWORDS
        .iter()
        .filter(|k| text_lower.contains(*k))
        .map(|k| title_case(k))
        .collect();
    (!found.is_empty()).then(|| found.join(", "))
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Post-study work route named on the page for the university's country
pub fn visa_extension(text: &str, profile: &CountryProfile) -> Option<String> {
    let pattern = profile.visa_extension_pattern?;
    let re = Regex::new(pattern).ok()?;
    re.find(text).map(|m| format!("Yes - {}", m.as_str()))
}

/// Identifier of a university's outcome record
pub fn outcome_id(university: &str) -> String {
    generate_id(IdKind::Outcome, &[university])
}

/// Extracts graduate outcomes
///
/// # Returns
///
/// Exactly one record; without a career page it holds country defaults only
pub async fn extract(env: &ExtractEnv, ctx: &UniversityContext) -> Outcome {
    tracing::info!("Extracting graduate outcomes for {}", ctx.name);

    match env.probe_first(&ctx.base_url, CANDIDATE_PATHS).await {
        Some(page) => {
            env.cite(ctx, "Graduate outcomes", &page.url);
            let mut record = parse_outcome(&page, ctx, &env.tables);
            apply_defaults(&mut record, ctx, &env.tables);
            record
        }
        None => {
            tracing::warn!("No career page for {}, using defaults", ctx.name);
            fallback(env, ctx)
        }
    }
}

/// Mines a career or alumni page
pub fn parse_outcome(page: &Page, ctx: &UniversityContext, tables: &ReferenceTables) -> Outcome {
    let text = page.text.as_str();
    let lower = page.lower_text();
    let yes = |rule: &FieldRules| rule.matches(text).then(|| "Yes".to_string());

    let (starting_salary, salary_currency) = match SALARY.first(text) {
        Some(found) => {
            let (amount, code) = split_currency(&found);
            (Some(amount), code)
        }
        None => (None, None),
    };
    let currency = salary_currency.map(str::to_string).or_else(|| {
        starting_salary
            .as_ref()
            .and_then(|_| tables.country(&ctx.country))
            .map(|p| p.currency.to_string())
    });

    Outcome {
        outcome_id: outcome_id(&ctx.name),
        univ_id: ctx.univ_id.clone(),
        prog_id: None,
        employability_rate: EMPLOYMENT.first(text),
        starting_salary,
        currency,
        months_to_first_job: TIME_TO_JOB.first(text),
        top_employers: EMPLOYERS
            .first(text)
            .and_then(|found| employers(&found, tables.known_employers)),
        internships: INTERNSHIPS.matches(text).then(|| "Available".to_string()),
        industry_partnerships: PARTNERSHIPS
            .first(text)
            .and_then(|found| employers(&found, tables.known_employers)),
        alumni_network_size: ALUMNI_SIZE.first(text),
        alumni_events: yes(&*ALUMNI_EVENTS),
        mentorship: yes(&*MENTORSHIP),
        further_study_rate: FURTHER_STUDY.first(text),
        job_satisfaction: None,
        career_services: career_services(&lower),
        visa_extension: tables
            .country(&ctx.country)
            .and_then(|profile| visa_extension(text, profile)),
        notes: String::new(),
    }
}

/// Fills unstated figures from generic and country defaults
pub fn apply_defaults(record: &mut Outcome, ctx: &UniversityContext, tables: &ReferenceTables) {
    let profile = tables.country(&ctx.country);

    record
        .employability_rate
        .get_or_insert_with(|| DEFAULT_EMPLOYABILITY.to_string());
    record
        .months_to_first_job
        .get_or_insert_with(|| DEFAULT_TIME_TO_JOB.to_string());
    record
        .career_services
        .get_or_insert_with(|| DEFAULT_CAREER_SERVICES.to_string());

    if record.starting_salary.is_none() {
        record.starting_salary = Some(
            profile
                .map(|p| p.starting_salary)
                .unwrap_or(tables.default_salary)
                .to_string(),
        );
        record.currency = Some(profile.map(|p| p.currency).unwrap_or("USD").to_string());
    }
    record
        .currency
        .get_or_insert_with(|| profile.map(|p| p.currency).unwrap_or("USD").to_string());

    record.visa_extension.get_or_insert_with(|| {
        profile
            .map(|p| p.visa_extension)
            .unwrap_or(DEFAULT_VISA_EXTENSION)
            .to_string()
    });
}

/// Defaults only, marked approximate
pub fn fallback(env: &ExtractEnv, ctx: &UniversityContext) -> Outcome {
    let mut record = Outcome {
        outcome_id: outcome_id(&ctx.name),
        univ_id: ctx.univ_id.clone(),
        notes: APPROXIMATE_NOTE.to_string(),
        ..Default::default()
    };
    apply_defaults(&mut record, ctx, &env.tables);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UniversityTarget;
    use url::Url;

    fn ctx(country: &str) -> UniversityContext {
        let target = UniversityTarget {
            name: "Example University".to_string(),
            city: "Boston".to_string(),
            country: country.to_string(),
            base_url: Url::parse("https://example.edu/").unwrap(),
        };
        UniversityContext::new(&target, "UNIV0000ABCD")
    }

    fn page(html: &str) -> Page {
        Page::parse(&Url::parse("https://example.edu/careers").unwrap(), html)
    }

    const CAREER_PAGE: &str = "<h1>Career outcomes</h1>
        <p>94% of our graduates are employed within six months. Graduates find a job in 8 weeks on average.</p>
        <p>The median starting salary is $82,500 for master's graduates.</p>
        <p>Top employers: Google, Deloitte and a key regional bank.</p>
        <p>Students can join paid internship programs. Our alumni network spans 120,000 members.</p>
        <p>Regular alumni events and a mentoring program connect students. 12% continue to PhD study.</p>
        <p>We offer career counseling, resume review and an annual career fair.</p>
        <p>International graduates may apply for OPT after graduation.</p>";

    #[test]
    fn test_parse_outcome_page() {
        let tables = ReferenceTables::builtin();
        let record = parse_outcome(&page(CAREER_PAGE), &ctx("Estados Unidos"), &tables);

        assert_eq!(record.employability_rate.as_deref(), Some("94"));
        assert_eq!(record.months_to_first_job.as_deref(), Some("2"));
        assert_eq!(record.starting_salary.as_deref(), Some("82,500"));
        assert_eq!(record.currency.as_deref(), Some("USD"));
        assert_eq!(record.top_employers.as_deref(), Some("Google, Deloitte"));
        assert_eq!(record.internships.as_deref(), Some("Available"));
        assert_eq!(record.alumni_network_size.as_deref(), Some("120,000"));
        assert_eq!(record.alumni_events.as_deref(), Some("Yes"));
        assert_eq!(record.mentorship.as_deref(), Some("Yes"));
        assert_eq!(record.further_study_rate.as_deref(), Some("12"));
        assert_eq!(
            record.career_services.as_deref(),
            Some("Career Counseling, Resume Review, Career Fair")
        );
        assert_eq!(record.visa_extension.as_deref(), Some("Yes - OPT"));
    }

    #[test]
    fn test_defaults_fill_missing_values() {
        let tables = ReferenceTables::builtin();
        let ctx = ctx("España");
        let mut record = parse_outcome(&page("<p>Welcome to the careers office.</p>"), &ctx, &tables);
        apply_defaults(&mut record, &ctx, &tables);

        assert_eq!(record.employability_rate.as_deref(), Some(DEFAULT_EMPLOYABILITY));
        assert_eq!(record.months_to_first_job.as_deref(), Some(DEFAULT_TIME_TO_JOB));
        assert_eq!(record.career_services.as_deref(), Some(DEFAULT_CAREER_SERVICES));
        let spain = tables.country("España").unwrap();
        assert_eq!(record.starting_salary.as_deref(), Some(spain.starting_salary));
        assert_eq!(record.currency.as_deref(), Some("EUR"));
        assert_eq!(record.visa_extension.as_deref(), Some(spain.visa_extension));
    }

    #[test]
    fn test_unknown_country_uses_generic_defaults() {
        let tables = ReferenceTables::builtin();
        let ctx = ctx("Atlantis");
        let mut record = Outcome::default();
        apply_defaults(&mut record, &ctx, &tables);
        assert_eq!(record.starting_salary.as_deref(), Some(tables.default_salary));
        assert_eq!(record.visa_extension.as_deref(), Some(DEFAULT_VISA_EXTENSION));
    }

    #[test]
    fn test_employers_short_names_need_word_match() {
        let known = &["EY", "Google"];
        assert_eq!(employers("a key partner", known).as_deref(), Some("a key partner"));
        assert_eq!(employers("EY and Google", known).as_deref(), Some("EY, Google"));
        assert_eq!(employers("n/a", known), None);
    }

    #[test]
    fn test_alumni_count_rejects_years() {
        let record = parse_outcome(
            &page("<p>Since 2015 graduates have joined. 35,000 alumni worldwide.</p>"),
            &ctx("Estados Unidos"),
            &ReferenceTables::builtin(),
        );
        assert_eq!(record.alumni_network_size.as_deref(), Some("35,000"));
    }
}
