//! Graduate program extraction
//!
//! Programs are discovered in three tiers: links on program listing pages,
//! type-specific path guesses, then the site's own search page. Each program
//! page found is mined field by field; when no tier finds anything, one
//! placeholder program per program type is emitted.

use super::rules::{self, contains_any, lookup, lookup_all, truncate, FieldRules, Transform};
use super::tables::PathLocale;
use super::{candidate_paths, find_email, ExtractEnv, UniversityContext, Visited};
use crate::crawler::Page;
use crate::records::{generate_id, IdKind, Program, APPROXIMATE_NOTE};
use crate::url::join_path;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

/// A family of programs the dossier tracks
#[derive(Debug, Clone, Copy)]
pub struct ProgramType {
    pub name: &'static str,

    /// Words identifying program links and pages of this type
    pub keywords: &'static [&'static str],

    /// Words a program page heading must contain to be taken as its name
    pub title_keywords: &'static [&'static str],

    /// Type-specific path guesses
    pub paths: &'static [&'static str],
}

pub const PROGRAM_TYPES: &[ProgramType] = &[
    ProgramType {
        name: "Computer Science",
        keywords: &[
            "computer science", "computing", "informatics", "software engineering",
            "artificial intelligence", "machine learning", "data science", "computer engineering",
            "ciencias de la computación", "informatik", "informatica", "informatique",
        ],
        title_keywords: &["computer science", "computing", "software", "artificial intelligence"],
        paths: &[
            "/cs", "/computerscience", "/computing", "/informatics", "/engineering/cs",
            "/computer-science", "/msc/cs", "/study/computerscience", "/graduate/cs",
            "/postgraduate/cs", "/informatica", "/informatik", "/informatique",
        ],
    },
    ProgramType {
        name: "Business Analytics",
        keywords: &[
            "business analytics", "data analytics", "business intelligence", "analytics",
            "business data", "big data", "mba analytics", "management analytics",
            "analítica de negocios", "wirtschaftsanalytik", "analyse commerciale",
            "analítica empresarial",
        ],
        title_keywords: &["business analytics", "data analytics", "business intelligence"],
        paths: &[
            "/business", "/analytics", "/mba", "/management", "/datascience",
            "/business-analytics", "/msc/analytics", "/study/analytics", "/business-intelligence",
            "/graduate/business", "/data-analytics", "/analytica", "/data-science",
            "/business-school",
        ],
    },
    ProgramType {
        name: "Mathematics",
        keywords: &[
            "mathematics", "mathematical", "applied mathematics", "statistics",
            "computational mathematics", "mathematical modeling", "matemáticas", "mathematik",
            "mathématiques", "matemática", "estadística", "statistik", "statistique",
            "statistica",
        ],
        title_keywords: &["math", "mathematics", "applied mathematics", "statistics"],
        paths: &[
            "/math", "/mathematics", "/statistics", "/appliedmath", "/applied-mathematics",
            "/msc/mathematics", "/study/mathematics", "/graduate/math",
            "/postgraduate/mathematics", "/mathematik", "/matematicas", "/mathematiques",
        ],
    },
];

/// Programs kept per program type from listing pages
pub const MAX_PER_TYPE: usize = 3;

const LISTING_PATHS: &[&str] = &[
    "/graduate", "/postgraduate", "/masters", "/study", "/programs", "/academics", "/degrees",
    "/courses", "/prospective-students", "/admissions/graduate", "/faculties", "/departments",
    "/education", "/international",
];

const LOCALIZED_LISTING_PATHS: &[(PathLocale, &[&str])] = &[
    (PathLocale::Spanish, &["/estudios", "/masteres", "/posgrado", "/formacion"]),
    (PathLocale::German, &["/studium", "/master", "/studiengang", "/international/study"]),
    (
        PathLocale::LatinAmerican,
        &["/posgrados", "/maestrias", "/oferta-academica", "/programas-academicos"],
    ),
];

const INTERNATIONAL_LISTING_PATHS: &[&str] = &[
    "/en/graduate", "/en/study", "/en/programmes", "/en/education", "/en/education/master",
    "/en/masters", "/english", "/international/prospective", "/international/programs",
];

/// Words that mark a page as a program listing
const LISTING_INDICATORS: &[&str] = &[
    "master", "program", "degree", "study", "course", "postgraduate", "graduate", "msc", "ma ",
    "ms ", "master's", "maestría", "posgrado", "studium", "studiengang",
];

const MODE_LABELS: &[(&str, &str)] = &[
    ("full-time", "Full-time"),
    ("fulltime", "Full-time"),
    ("full time", "Full-time"),
    ("part-time", "Part-time"),
    ("parttime", "Part-time"),
    ("part time", "Part-time"),
    ("online", "Online"),
    ("hybrid", "Hybrid"),
    ("distance", "Online"),
    ("on-campus", "Full-time"),
    ("on campus", "Full-time"),
];

const DEGREE_LABELS: &[(&str, &str)] = &[
    ("mphil", "Master of Philosophy"),
    ("meng", "Master of Engineering"),
    ("m.sc", "Master of Science"),
    ("msc", "Master of Science"),
    ("ms", "Master of Science"),
    ("ma", "Master of Arts"),
    ("master", "Master's"),
    ("ph.d", "Ph.D."),
    ("phd", "Ph.D."),
    ("doctorate", "Ph.D."),
    ("certificate", "Certificate"),
    ("diploma", "Diploma"),
];

const SEASON_LABELS: &[(&str, &str)] = &[
    ("fall", "Fall"),
    ("autumn", "Fall"),
    ("september", "Fall"),
    ("october", "Fall"),
    ("spring", "Spring"),
    ("january", "Spring"),
    ("february", "Spring"),
    ("summer", "Summer"),
    ("winter", "Winter"),
];

const CURRENCY_SYMBOLS: &[(&str, &str)] = &[("$", "USD"), ("€", "EUR"), ("£", "GBP"), ("¥", "JPY")];

static DURATION: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[
            r"(?i)(?:duration|length|program length)\D{0,60}?(\d+(?:\.\d+)?)\s*years?",
            r"(?i)(\d+(?:\.\d+)?)\s*years?\b.{0,60}?(?:duration|length|program)",
            r"(?i)(\d+(?:\.\d+)?)\s*years?\s*(?:course|program|degree)",
        ],
        1,
    )
});

static MODE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (
            r"(?i)(?:mode of study|delivery mode|study mode).{0,40}?(full[- ]?time|part[- ]?time|online|hybrid)",
            mode_label as Transform,
        ),
        (
            r"(?i)\b(full[- ]?time|part[- ]?time|online|hybrid|distance|on[- ]campus)\b",
            mode_label,
        ),
    ])
});

static DEGREE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (
            r"(?i)(?:degree type|type of degree|qualification).{0,40}?\b(master|msc|ma|ms|meng|mphil|phd|doctorate)\b",
            degree_label as Transform,
        ),
        (
            r"(?i)\b(master|msc|m\.sc|meng|mphil|phd|ph\.d|doctorate|certificate|diploma)\b",
            degree_label,
        ),
    ])
});

static CREDITS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[
            r"(?i)\b(\d{2,3})\s*(?:ects|credits|credit hours)\b",
            r"(?i)\b(?:credits|credit hours|ects)\D{0,20}?(\d{2,3})\b",
        ],
        1,
    )
});

static TUITION: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[
            r"(?i)(?:tuition|fees?|cost|price)\D{0,40}?[$€£¥]?\s?(?:\d{1,3}(?:,\d{3})+|\d{4,})",
            r"(?i)[$€£¥]?\s?(?:\d{1,3}(?:,\d{3})+|\d{4,}).{0,40}?(?:tuition|fee|per year|annual)",
        ],
        0,
    )
});

static AMOUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+|\d{4,}").ok());

static CURRENCY_CODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(USD|EUR|GBP|CHF|CAD|MXN|CLP)\b").ok());

static DEADLINE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[
            r"(?i)(?:application deadline|apply by|submission deadline)\D{0,30}?(\d{1,2}[-/. ]\d{1,2}[-/. ]\d{2,4}|\d{1,2} [A-Za-z]+ \d{2,4}|[A-Za-z]+ \d{1,2},? \d{2,4})",
            r"(?i)deadline\D{0,30}?(\d{1,2} [A-Za-z]+ \d{2,4}|[A-Za-z]+ \d{1,2},? \d{4})",
        ],
        1,
    )
});

static SEASONS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (
            r"(?i)(?:intake|start date|program starts?|admission cycle|term|applications? accepted)[^.]{0,80}",
            seasons as Transform,
        ),
        (r"(?i)\b(?:fall|spring|autumn|september|january)\b", seasons),
    ])
});

static START_DATE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[r"(?i)(?:program starts?|start date|starting|commences?)\D{0,20}?\b((?:January|February|March|April|May|June|July|August|September|October|November|December)(?: \d{4})?)"],
        1,
    )
});

static TOEFL: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)toefl\D{0,30}?(\d{2,3})\b"], 1));

static IELTS: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)ielts\D{0,30}?(\d(?:\.\d)?)\b"], 1));

static PREREQUISITES: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (
            r"(?i)(?:prerequisites?|required courses|academic background)[:\s]+([^.]{10,})",
            prerequisite as Transform,
        ),
        (
            r"(?i)(?:candidates?|applicants?|students?) (?:should|must|are expected to) ([^.]{10,})",
            prerequisite,
        ),
    ])
});

static COORDINATOR: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[r"(?:[Cc]oordinator|[Dd]irector|[Cc]ontact)[:\s]+((?:Prof\. |Dr\. )?[A-Z][a-z]+(?: [A-Z][a-z.]+){1,3})"],
        1,
    )
});

fn mode_label(caps: &Captures<'_>) -> Option<String> {
    let found = rules::first_group(caps)?.to_lowercase();
    lookup(&found, MODE_LABELS).map(str::to_string)
}

fn degree_label(caps: &Captures<'_>) -> Option<String> {
    let found = rules::first_group(caps)?.to_lowercase();
    DEGREE_LABELS
        .iter()
        .find(|(key, _)| *key == found)
        .map(|(_, label)| label.to_string())
}

fn seasons(caps: &Captures<'_>) -> Option<String> {
    let found = caps.get(0)?.as_str().to_lowercase();
    let labels = lookup_all(&found, SEASON_LABELS);
    (!labels.is_empty()).then(|| labels.join(", "))
}

fn prerequisite(caps: &Captures<'_>) -> Option<String> {
    let found = rules::first_group(caps)?;
    let lower = found.to_lowercase();
    (lower.contains("background") || lower.contains("degree")).then(|| truncate(&found, 100))
}

/// Identifier of a program within a university
pub fn program_id(program_name: &str, university: &str) -> String {
    generate_id(IdKind::Program, &[program_name, university])
}

/// Adds `program` unless a program with the same identifier is listed
///
/// Two pages carrying the same program name map to one `Prog_ID`, so only
/// the first is kept.
fn push_unique(programs: &mut Vec<Program>, program: Program) -> bool {
    if programs.iter().any(|p| p.prog_id == program.prog_id) {
        tracing::debug!("Skipping duplicate program {}", program.name);
        return false;
    }
    programs.push(program);
    true
}

/// Extracts the university's programs
///
/// # Returns
///
/// At least one record; placeholders when no program page was found
pub async fn extract(env: &ExtractEnv, ctx: &UniversityContext) -> Vec<Program> {
    tracing::info!("Extracting programs for {}", ctx.name);

    let currency = country_currency(env, ctx);
    let mut programs: Vec<Program> = Vec::new();
    let mut visited = Visited::new();

    let locale = env.tables.country(&ctx.country).and_then(|p| p.locale);
    let listing_paths = candidate_paths(
        LISTING_PATHS,
        LOCALIZED_LISTING_PATHS,
        locale,
        INTERNATIONAL_LISTING_PATHS,
    );

    // Tier 1: program links on listing pages
    let mut found_listing = false;
    for path in listing_paths {
        let Some(url) = join_path(&ctx.base_url, path) else {
            continue;
        };
        let Some(listing) = env.page(&url).await else {
            continue;
        };
        if !contains_any(&listing.lower_text(), LISTING_INDICATORS) {
            continue;
        }
        found_listing = true;
        tracing::debug!("Program listing found at {}", url);

        for program_type in PROGRAM_TYPES {
            for link in program_links(&listing, program_type) {
                if count_of(&programs, program_type) >= MAX_PER_TYPE {
                    break;
                }
                if !visited.insert(&link) {
                    continue;
                }
                if let Some(page) = env.page(&link).await {
                    let program = parse_program(&page, ctx, program_type, currency.as_deref());
                    let name = program.name.clone();
                    if push_unique(&mut programs, program) {
                        env.cite(ctx, &format!("Program: {}", name), &link);
                    }
                }
            }
        }
    }

    // Tier 2: type-specific path guesses, one program per type
    if !found_listing || programs.is_empty() {
        for program_type in PROGRAM_TYPES {
            for path in program_type.paths {
                let Some(url) = join_path(&ctx.base_url, path) else {
                    continue;
                };
                if !visited.insert(&url) {
                    continue;
                }
                if let Some(page) = env.page(&url).await {
                    let program = parse_program(&page, ctx, program_type, currency.as_deref());
                    let name = program.name.clone();
                    if push_unique(&mut programs, program) {
                        env.cite(ctx, &format!("Program: {}", name), &url);
                        break;
                    }
                }
            }
        }
    }

    // Tier 3: the site's search page for types still missing
    if programs.len() < PROGRAM_TYPES.len() {
        for program_type in PROGRAM_TYPES {
            if count_of(&programs, program_type) > 0 {
                continue;
            }
            if let Some(program) =
                search_program(env, ctx, program_type, currency.as_deref(), &mut visited).await
            {
                push_unique(&mut programs, program);
            }
        }
    }

    if programs.is_empty() {
        tracing::warn!("No programs found for {}, generating placeholders", ctx.name);
        return fallback(env, ctx);
    }

    tracing::info!("Found {} programs for {}", programs.len(), ctx.name);
    programs
}

async fn search_program(
    env: &ExtractEnv,
    ctx: &UniversityContext,
    program_type: &ProgramType,
    currency: Option<&str>,
    visited: &mut Visited,
) -> Option<Program> {
    let domain = ctx.base_url.host_str().unwrap_or_default().to_string();
    let queries = [
        format!("site:{} master's program {}", domain, program_type.name),
        format!("site:{} {} degree", domain, program_type.name),
        format!("site:{} graduate {}", domain, program_type.name),
    ];

    for query in &queries {
        let Some(mut url) = join_path(&ctx.base_url, "/search") else {
            continue;
        };
        url.query_pairs_mut().append_pair("q", query);
        if !visited.insert(&url) {
            continue;
        }
        let Some(results) = env.page(&url).await else {
            continue;
        };

        for link in program_links(&results, program_type) {
            if !visited.insert(&link) {
                continue;
            }
            if let Some(page) = env.page(&link).await {
                let program = parse_program(&page, ctx, program_type, currency);
                env.cite(ctx, &format!("Program (search): {}", program.name), &link);
                return Some(program);
            }
        }
    }
    None
}

fn country_currency(env: &ExtractEnv, ctx: &UniversityContext) -> Option<String> {
    env.tables
        .country(&ctx.country)
        .map(|profile| profile.currency.to_string())
}

fn count_of(programs: &[Program], program_type: &ProgramType) -> usize {
    programs
        .iter()
        .filter(|p| p.focus_areas.as_deref() == Some(program_type.name))
        .count()
}

/// Links on a page that point at programs of `program_type`
///
/// Anchors whose text carries a type keyword come first, then every link in
/// a section whose heading carries one.
pub fn program_links(page: &Page, program_type: &ProgramType) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();
    for keyword in program_type.keywords {
        for link in page.links_with_text(keyword) {
            if !links.contains(&link.url) {
                links.push(link.url.clone());
            }
        }
        for heading in &page.headings {
            if heading.text.to_lowercase().contains(keyword) {
                for link in &heading.section_links {
                    if !links.contains(&link.url) {
                        links.push(link.url.clone());
                    }
                }
            }
        }
    }
    links
}

/// Builds a program record from its page
///
/// # Arguments
///
/// * `page` - The program page
/// * `ctx` - The owning university
/// * `program_type` - The type the page was discovered under
/// * `country_currency` - Currency assumed for amounts without a symbol
pub fn parse_program(
    page: &Page,
    ctx: &UniversityContext,
    program_type: &ProgramType,
    country_currency: Option<&str>,
) -> Program {
    let name = program_name(page, program_type);
    let text = &page.text;

    let (tuition, currency) = match TUITION.first(text) {
        Some(found) => parse_tuition(&found, country_currency),
        None => (None, None),
    };

    let language_requirement = {
        let mut parts = Vec::new();
        if let Some(score) = TOEFL.first(text) {
            parts.push(format!("TOEFL: {}", score));
        }
        if let Some(score) = IELTS.first(text) {
            parts.push(format!("IELTS: {}", score));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    };

    let contact_email = find_email(text);
    let coordinator = contact_email.as_ref().and_then(|_| COORDINATOR.first(text));

    Program {
        prog_id: program_id(&name, &ctx.name),
        univ_id: ctx.univ_id.clone(),
        name,
        degree_type: DEGREE.first(text),
        website: Some(page.url.to_string()),
        duration_years: DURATION.first(text),
        mode: MODE.first(text),
        credits: CREDITS.first(text),
        tuition_per_year: tuition,
        currency,
        focus_areas: Some(program_type.name.to_string()),
        application_deadline: DEADLINE.first(text),
        admission_seasons: SEASONS.first(text),
        start_date: START_DATE.first(text),
        cohort_size: None,
        language_requirement,
        prerequisites: PREREQUISITES.first(text),
        funding_options: None,
        coordinator,
        contact_email,
        notes: String::new(),
    }
}

/// Program name: a heading naming the type, else the page title
fn program_name(page: &Page, program_type: &ProgramType) -> String {
    page.headings
        .iter()
        .filter(|h| h.level <= 3)
        .map(|h| h.text.as_str())
        .find(|text| {
            let lower = text.to_lowercase();
            program_type.title_keywords.iter().any(|k| lower.contains(k))
        })
        .or(page.title.as_deref())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} Program", program_type.name))
}

/// Splits a tuition match into the amount and its currency
fn parse_tuition(found: &str, country_currency: Option<&str>) -> (Option<String>, Option<String>) {
    let amount = AMOUNT
        .as_ref()
        .and_then(|re| re.find(found))
        .map(|m| m.as_str().to_string());
    if amount.is_none() {
        return (None, None);
    }

    let currency = CURRENCY_SYMBOLS
        .iter()
        .find(|(symbol, _)| found.contains(symbol))
        .map(|(_, code)| code.to_string())
        .or_else(|| {
            CURRENCY_CODE
                .as_ref()
                .and_then(|re| re.captures(found))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .or_else(|| country_currency.map(str::to_string));

    (amount, currency)
}

/// Placeholder programs, one per program type
pub fn fallback(env: &ExtractEnv, ctx: &UniversityContext) -> Vec<Program> {
    fallback_programs(ctx, country_currency(env, ctx).as_deref())
}

/// Placeholder programs for `ctx` priced in `currency` (USD when unknown)
pub fn fallback_programs(ctx: &UniversityContext, currency: Option<&str>) -> Vec<Program> {
    let site = ctx.site();
    let host = ctx.base_url.host_str().unwrap_or_default();

    PROGRAM_TYPES
        .iter()
        .map(|program_type| {
            let name = format!("{} Master's Program", program_type.name);
            let slug = program_type.name.to_lowercase().replace(' ', "-");
            Program {
                prog_id: program_id(&name, &ctx.name),
                univ_id: ctx.univ_id.clone(),
                degree_type: Some("Master's".to_string()),
                website: Some(format!("{}/programs/{}", site, slug)),
                duration_years: Some("2".to_string()),
                mode: Some("Full-time".to_string()),
                credits: Some("120".to_string()),
                tuition_per_year: Some("Check the official website".to_string()),
                currency: Some(currency.unwrap_or("USD").to_string()),
                focus_areas: Some(program_type.name.to_string()),
                application_deadline: Some("Check the official website".to_string()),
                admission_seasons: Some("Fall".to_string()),
                start_date: Some("September".to_string()),
                cohort_size: Some("25-50".to_string()),
                language_requirement: Some("TOEFL: 90, IELTS: 6.5".to_string()),
                prerequisites: Some(format!(
                    "Bachelor's degree in {} or related field",
                    program_type.name
                )),
                funding_options: Some("Scholarships available".to_string()),
                coordinator: Some("Academic Staff".to_string()),
                contact_email: Some(format!("admissions@{}", host)),
                notes: APPROXIMATE_NOTE.to_string(),
                name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UniversityTarget;

    fn ctx() -> UniversityContext {
        let target = UniversityTarget {
            name: "Example University".to_string(),
            city: "Madrid".to_string(),
            country: "España".to_string(),
            base_url: Url::parse("https://example.edu/").unwrap(),
        };
        UniversityContext::new(&target, "UNIV0000ABCD")
    }

    fn page(html: &str) -> Page {
        Page::parse(&Url::parse("https://example.edu/msc-cs").unwrap(), html)
    }

    const PROGRAM_PAGE: &str = r#"<html><head><title>Study at Example</title></head><body>
        <h1>MSc in Computer Science</h1>
        <p>Duration: 2 years, full-time. Total of 120 ECTS credits.</p>
        <p>Tuition fee: €12,500 per year.</p>
        <p>Application deadline: 15 March 2025. Intake in September each year.</p>
        <p>English: TOEFL iBT 92 or IELTS 7.0.</p>
        <p>Prerequisites: a bachelor's degree in computing or a related field.</p>
        <p>Program coordinator: Dr. Ana Torres, ana.torres@example.edu</p>
    </body></html>"#;

    #[test]
    fn test_parse_program_page() {
        let program = parse_program(&page(PROGRAM_PAGE), &ctx(), &PROGRAM_TYPES[0], Some("EUR"));

        assert_eq!(program.name, "MSc in Computer Science");
        assert_eq!(program.univ_id, "UNIV0000ABCD");
        assert_eq!(program.duration_years.as_deref(), Some("2"));
        assert_eq!(program.mode.as_deref(), Some("Full-time"));
        assert_eq!(program.degree_type.as_deref(), Some("Master of Science"));
        assert_eq!(program.credits.as_deref(), Some("120"));
        assert_eq!(program.tuition_per_year.as_deref(), Some("12,500"));
        assert_eq!(program.currency.as_deref(), Some("EUR"));
        assert_eq!(program.application_deadline.as_deref(), Some("15 March 2025"));
        assert_eq!(program.admission_seasons.as_deref(), Some("Fall"));
        assert_eq!(program.language_requirement.as_deref(), Some("TOEFL: 92, IELTS: 7.0"));
        assert_eq!(program.contact_email.as_deref(), Some("ana.torres@example.edu"));
        assert_eq!(program.coordinator.as_deref(), Some("Dr. Ana Torres"));
        assert_eq!(program.focus_areas.as_deref(), Some("Computer Science"));
        assert!(program.prerequisites.unwrap().contains("degree"));
        assert!(program.notes.is_empty());
    }

    #[test]
    fn test_same_named_program_pages_kept_once() {
        let html = "<html><body><h1>MSc in Computer Science</h1><p>Full-time.</p></body></html>";
        let first = parse_program(&page(html), &ctx(), &PROGRAM_TYPES[0], None);
        let other = Page::parse(&Url::parse("https://example.edu/en/msc-cs").unwrap(), html);
        let second = parse_program(&other, &ctx(), &PROGRAM_TYPES[0], None);
        assert_eq!(first.prog_id, second.prog_id);

        let mut programs = Vec::new();
        assert!(push_unique(&mut programs, first));
        assert!(!push_unique(&mut programs, second));
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].website.as_deref(), Some("https://example.edu/msc-cs"));
    }

    #[test]
    fn test_name_falls_back_to_title() {
        let html = "<html><head><title>Graduate Studies</title></head><body><p>x</p></body></html>";
        let program = parse_program(&page(html), &ctx(), &PROGRAM_TYPES[2], None);
        assert_eq!(program.name, "Graduate Studies");
        assert_eq!(program.duration_years, None);
    }

    #[test]
    fn test_tuition_currency_from_country_without_symbol() {
        assert_eq!(
            parse_tuition("tuition 9800", Some("CHF")),
            (Some("9800".to_string()), Some("CHF".to_string()))
        );
        assert_eq!(
            parse_tuition("fees: GBP 21,000", Some("EUR")),
            (Some("21,000".to_string()), Some("GBP".to_string()))
        );
    }

    #[test]
    fn test_program_links_from_anchors_and_sections() {
        let html = r#"<body>
            <a href="/msc-ai">MSc Artificial Intelligence</a>
            <div><h3>Statistics</h3><a href="/stats-master">Learn more</a></div>
            <a href="/news">News</a>
        </body>"#;
        let listing = Page::parse(&Url::parse("https://example.edu/graduate").unwrap(), html);

        let cs = program_links(&listing, &PROGRAM_TYPES[0]);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].path(), "/msc-ai");

        let math = program_links(&listing, &PROGRAM_TYPES[2]);
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].path(), "/stats-master");
    }

    #[test]
    fn test_fallback_programs() {
        let programs = fallback_programs(&ctx(), Some("EUR"));
        assert_eq!(programs.len(), PROGRAM_TYPES.len());
        for program in &programs {
            assert_eq!(program.univ_id, "UNIV0000ABCD");
            assert_eq!(program.notes, APPROXIMATE_NOTE);
            assert_eq!(program.contact_email.as_deref(), Some("admissions@example.edu"));
            assert_eq!(program.currency.as_deref(), Some("EUR"));
        }
        assert_eq!(programs[0].name, "Computer Science Master's Program");
        assert_eq!(
            programs[1].website.as_deref(),
            Some("https://example.edu/programs/business-analytics")
        );
    }

    #[test]
    fn test_program_ids_differ_per_university() {
        assert_ne!(
            program_id("MSc Data Science", "Uni A"),
            program_id("MSc Data Science", "Uni B")
        );
    }
}
