//! Scholarship extraction
//!
//! Funding pages are probed in several languages. Scholarship titles are
//! discovered from list items, headings and scholarship-classed blocks, and
//! the text around each title is mined with the rule table of the page's
//! language. When the site yields fewer than three scholarships, the list is
//! topped up from the international scholarship catalogue.

use super::lang::{self, Language, SCHOLARSHIP_KEYWORDS};
use super::rules::{self, truncate, FieldRules, Transform};
use super::tables::{PathLocale, ReferenceTables};
use super::{candidate_paths, find_email, ExtractEnv, UniversityContext, Visited};
use crate::crawler::parser::{collapse_whitespace, element_text, selector};
use crate::records::{generate_id, IdKind, Scholarship, APPROXIMATE_NOTE};
use crate::url::join_path;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Scholarships kept per university
pub const MAX_SCHOLARSHIPS: usize = 5;

/// Below this many found scholarships the catalogue is consulted
pub const TOP_UP_THRESHOLD: usize = 3;

const LISTING_PATHS: &[&str] = &[
    "/scholarships", "/financial-aid", "/funding", "/fees-and-funding",
    "/international/scholarships", "/graduate/funding", "/admissions/financial-aid",
    "/tuition-and-fees", "/prospective-students/funding", "/student-finance",
    "/becas", "/ayudas", "/financiacion", "/ayudas-economicas",
    "/estudiantes-internacionales/becas", "/stipendien", "/finanzierung",
    "/studienfinanzierung", "/foerderung", "/beurzen", "/financiering", "/studiefinanciering",
];

const LOCALIZED_LISTING_PATHS: &[(PathLocale, &[&str])] = &[
    (PathLocale::Spanish, &["/ayudas-estudio", "/estudiantes/becas", "/servicios/becas"]),
    (
        PathLocale::German,
        &["/international/stipendien", "/studium/stipendien", "/international/finanzierung"],
    ),
    (
        PathLocale::LatinAmerican,
        &["/apoyos-financieros", "/becas-y-financiamiento", "/apoyo-economico"],
    ),
];

const INTERNATIONAL_LISTING_PATHS: &[&str] = &[
    "/en/scholarships", "/en/financial-aid", "/en/fees-and-funding",
    "/en/international/scholarships", "/en/student-finance",
];

/// Titles opening with these words are notices, not scholarships
const NOTICE_PREFIXES: &[&str] = &["note", "important", "please", "para", "hinweis", "let", "meer"];

/// Class fragments of blocks that describe one scholarship
const SCHOLARSHIP_CLASS_HINTS: &[&str] = &["scholarship", "award", "grant", "beca", "stipendium", "beurs"];

const TITLE_MIN_CHARS: usize = 5;
const TITLE_MAX_CHARS: usize = 100;
const ELIGIBILITY_MAX_CHARS: usize = 150;

/// Words near a number that mark it as a scholarship amount
const AMOUNT_INDICATORS: &[&str] = &[
    "scholarship", "award", "grant", "funding", "stipend", "beca", "financiación", "monto",
    "stipendium", "betrag", "beurs", "bedrag", "amount", "value", "worth", "up to", "hasta",
    "bis zu", "tot", "receive", "awarded", "provides", "offers", "covers", "includes",
];

/// Characters of context inspected on each side of an amount
const AMOUNT_CONTEXT_CHARS: usize = 30;

const CURRENCY_SYMBOLS: &[(&str, &str)] = &[("$", "USD"), ("€", "EUR"), ("£", "GBP"), ("¥", "JPY")];

/// Competitiveness tiers, checked in order
const COMPETITIVENESS: &[(&str, &[&str])] = &[
    (
        "High",
        &[
            "highly competitive", "limited", "very selective", "few", "small number",
            "alta competencia", "limitado", "muy selectivo", "pocos", "reducido número",
            "stark umkämpft", "begrenzt", "sehr selektiv", "wenige", "geringe anzahl",
            "zeer competitief", "beperkt", "zeer selectief", "weinig", "klein aantal",
        ],
    ),
    (
        "Medium",
        &[
            "competitive", "selected", "moderate", "average", "competitivo", "seleccionado",
            "moderado", "promedio", "wettbewerbsfähig", "ausgewählt", "mäßig",
            "durchschnittlich", "competitief", "geselecteerd", "gematigd", "gemiddeld",
        ],
    ),
    (
        "Low",
        &[
            "all eligible", "many", "numerous", "most", "high number", "todos los elegibles",
            "muchos", "numerosos", "mayoría", "gran número", "alle berechtigten", "viele",
            "zahlreiche", "meisten", "hohe anzahl", "alle in aanmerking", "veel", "talrijk",
            "meeste", "groot aantal",
        ],
    ),
];

static AMOUNT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"([$€£¥])?\s?(\d{1,3}(?:,\d{3})+|\d{1,3}(?:\.\d{3})+|\d+)(?:\s?(USD|EUR|GBP|JPY|CHF|CAD|MXN|CLP)\b)?",
    )
    .ok()
});

static CONTACT_PERSON: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[(
        r"(?i:contact person|contact|contacto|ansprechpartner(?:in)?|kontakt|contactpersoon)[:\s]+((?:Prof\. |Dr\. )?\p{Lu}[\p{L}.\-]+(?:\s\p{Lu}[\p{L}.\-]+){1,3})",
        rules::group1 as Transform,
    )])
});

/// Compiled rules for funding pages in one language
pub struct ScholarshipRules {
    title_keywords: &'static [&'static str],
    funding_types: &'static [(&'static str, &'static str)],
    eligibility: FieldRules,
    deadline: FieldRules,
    awards: FieldRules,
    renewal: FieldRules,
    selection: FieldRules,
}

/// Rules of the form `<stem>...: <clause>` keeping the clause
fn stem_clauses(stems: &[&str]) -> FieldRules {
    let patterns: Vec<String> = stems
        .iter()
        .map(|stem| format!(r"(?i){}\p{{L}}*[:\s]+([^.]+)", regex::escape(stem)))
        .collect();
    let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
    FieldRules::group(&patterns, 1)
}

static RULES: LazyLock<HashMap<Language, ScholarshipRules>> = LazyLock::new(|| {
    HashMap::from([
        (
            Language::English,
            ScholarshipRules {
                title_keywords: &["scholarship", "fellowship", "grant", "fund", "award", "bursary", "financial aid", "stipend"],
                funding_types: &[
                    ("full tuition", "Full Tuition"),
                    ("partial tuition", "Partial Tuition"),
                    ("living stipend", "Living Stipend"),
                    ("travel grant", "Travel Grant"),
                    ("research grant", "Research Grant"),
                    ("teaching assistant", "Teaching Assistantship"),
                    ("research assistant", "Research Assistantship"),
                ],
                eligibility: FieldRules::group(
                    &[
                        r"(?i)(eligib\w*|requirements?|qualifications?)[:\s]+([^.]+)",
                        r"(?i)(available to|open to|for students?)[:\s]+([^.]+)",
                    ],
                    2,
                ),
                deadline: FieldRules::group(
                    &[r"(?i)(deadline|apply by|due|closing date)[:\s]+(\p{L}+ \d{1,2}(?:st|nd|rd|th)?,? \d{4}|\d{1,2}[- /.]\d{1,2}[- /.]\d{2,4})"],
                    2,
                ),
                awards: FieldRules::group(
                    &[r"(?i)\b(\d+)\s+(?:scholarships?|awards?|grants?|positions?|students?|candidates?)\b"],
                    1,
                ),
                renewal: stem_clauses(&["renew", "continue", "extension", "maintain"]),
                selection: stem_clauses(&["select", "process", "assess", "evaluat", "criteri"]),
            },
        ),
        (
            Language::Spanish,
            ScholarshipRules {
                title_keywords: &["beca", "ayuda", "financiación", "subvención", "premio", "apoyo económico", "estipendio"],
                funding_types: &[
                    ("matrícula completa", "Full Tuition"),
                    ("matrícula parcial", "Partial Tuition"),
                    ("manutención", "Living Stipend"),
                    ("viaje", "Travel Grant"),
                    ("investigación", "Research Grant"),
                    ("docencia", "Teaching Assistantship"),
                ],
                eligibility: FieldRules::group(
                    &[
                        r"(?i)(requisitos|elegibilidad|pueden solicitar)[:\s]+([^.]+)",
                        r"(?i)(disponible para|abierto a|para estudiantes)[:\s]+([^.]+)",
                    ],
                    2,
                ),
                deadline: FieldRules::group(
                    &[r"(?i)(fecha límite|plazo|vencimiento|cierre)[:\s]+(\d{1,2} de \p{L}+ (?:de )?\d{4}|\d{1,2}[- /.]\d{1,2}[- /.]\d{2,4})"],
                    2,
                ),
                awards: FieldRules::group(
                    &[r"(?i)\b(\d+)\s+(?:becas?|ayudas?|subvenciones?|plazas?|estudiantes?|candidatos?)\b"],
                    1,
                ),
                renewal: stem_clauses(&["renovar", "renovación", "continuar", "extensión", "mantener"]),
                selection: stem_clauses(&["selecci", "proces", "evalu", "criterios", "valoración"]),
            },
        ),
        (
            Language::German,
            ScholarshipRules {
                title_keywords: &["stipendium", "förderung", "beihilfe", "unterstützung", "finanzierung", "zuschuss"],
                funding_types: &[
                    ("vollstipendium", "Full Tuition"),
                    ("teilstipendium", "Partial Tuition"),
                    ("lebenshaltungskosten", "Living Stipend"),
                    ("reisekostenzuschuss", "Travel Grant"),
                    ("forschungsstipendium", "Research Grant"),
                    ("lehrassistenz", "Teaching Assistantship"),
                ],
                eligibility: FieldRules::group(
                    &[
                        r"(?i)(voraussetzungen|anforderungen|bewerbungsvoraussetzungen)[:\s]+([^.]+)",
                        r"(?i)(verfügbar für|offen für|für studierende)[:\s]+([^.]+)",
                    ],
                    2,
                ),
                deadline: FieldRules::group(
                    &[r"(?i)(bewerbungsschluss|frist|stichtag|einsendeschluss)[:\s]+(\d{1,2}\. \p{L}+ \d{4}|\d{1,2}[- /.]\d{1,2}[- /.]\d{2,4})"],
                    2,
                ),
                awards: FieldRules::group(
                    &[r"(?i)\b(\d+)\s+(?:stipendien|förderungen|auszeichnungen|plätze|studierende|kandidaten)\b"],
                    1,
                ),
                renewal: stem_clauses(&["erneuer", "verlänger", "fortsetz", "beibehalt"]),
                selection: stem_clauses(&["auswahl", "prozess", "bewert", "kriterien", "beurteil"]),
            },
        ),
        (
            Language::Dutch,
            ScholarshipRules {
                title_keywords: &["beurs", "studiebeurs", "toelage", "subsidie", "financiering", "ondersteuning"],
                funding_types: &[
                    ("volledige beurs", "Full Tuition"),
                    ("gedeeltelijke beurs", "Partial Tuition"),
                    ("levensonderhoud", "Living Stipend"),
                    ("reisbeurs", "Travel Grant"),
                    ("onderzoeksbeurs", "Research Grant"),
                ],
                eligibility: FieldRules::group(
                    &[
                        r"(?i)(voorwaarden|eisen|vereisten)[:\s]+([^.]+)",
                        r"(?i)(beschikbaar voor|open voor|voor studenten)[:\s]+([^.]+)",
                    ],
                    2,
                ),
                deadline: FieldRules::group(
                    &[r"(?i)(deadline|uiterste datum|sluitingsdatum)[:\s]+(\d{1,2} \p{L}+ \d{4}|\d{1,2}[- /.]\d{1,2}[- /.]\d{2,4})"],
                    2,
                ),
                awards: FieldRules::group(
                    &[r"(?i)\b(\d+)\s+(?:beurzen|toelagen|subsidies|plaatsen|studenten|kandidaten)\b"],
                    1,
                ),
                renewal: stem_clauses(&["vernieu", "verlenging", "voortzett", "behoud", "vervolg"]),
                selection: stem_clauses(&["selectie", "proces", "beoordel", "criteria", "evaluatie"]),
            },
        ),
    ])
});

/// Rule table for `lang`, falling back to English
pub fn rules_for(lang: Language) -> Option<&'static ScholarshipRules> {
    RULES.get(&lang).or_else(|| RULES.get(&Language::English))
}

/// A scholarship title and the text describing it
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub details: String,
}

/// What a funding page offers
#[derive(Debug, Clone)]
pub struct Listing {
    pub lang: Language,
    pub candidates: Vec<Candidate>,
}

/// Identifier of a scholarship at a university
pub fn scholarship_id(scholarship_name: &str, university: &str) -> String {
    generate_id(IdKind::Scholarship, &[scholarship_name, university])
}

/// Extracts the scholarships offered by a university
///
/// # Arguments
///
/// * `env` - Shared extraction services
/// * `ctx` - The university being processed
///
/// # Returns
///
/// At most five scholarships; never empty
pub async fn extract(env: &ExtractEnv, ctx: &UniversityContext) -> Vec<Scholarship> {
    tracing::info!("Extracting scholarships for {}", ctx.name);

    let profile = env.tables.country(&ctx.country);
    let locale = profile.and_then(|p| p.locale);
    let currency = profile.map(|p| p.currency).unwrap_or("USD");

    let mut scholarships: Vec<Scholarship> = Vec::new();
    let mut visited = Visited::new();

    let paths = candidate_paths(
        LISTING_PATHS,
        LOCALIZED_LISTING_PATHS,
        locale,
        INTERNATIONAL_LISTING_PATHS,
    );

    'pages: for path in paths {
        let Some(url) = join_path(&ctx.base_url, path) else {
            continue;
        };
        if !visited.insert(&url) {
            continue;
        }
        let doc = match env.fetcher.fetch(url.as_str()).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("No funding page at {}: {}", url, e);
                continue;
            }
        };

        let listing = parse_listing(&doc.body);
        tracing::debug!(
            "Funding page {} detected as {} with {} candidates",
            url,
            listing.lang.code(),
            listing.candidates.len()
        );

        for candidate in &listing.candidates {
            if scholarships.len() >= MAX_SCHOLARSHIPS {
                break 'pages;
            }
            if scholarships.iter().any(|s| s.name == candidate.title) {
                continue;
            }
            let record = parse_candidate(candidate, listing.lang, ctx, url.as_str(), currency);
            env.cite(ctx, &format!("Scholarship: {}", record.name), &url);
            scholarships.push(record);
        }
    }

    if scholarships.len() < TOP_UP_THRESHOLD {
        for added in top_up(&mut scholarships, &env.tables, ctx) {
            env.references.record(
                &ctx.name,
                &format!("International scholarship: {}", added.name),
                added.url,
            );
        }
    }

    if scholarships.is_empty() {
        tracing::warn!("No scholarships found for {}, using placeholders", ctx.name);
        return fallback(ctx);
    }

    scholarships
}

/// Detects the page language and discovers scholarship candidates
pub fn parse_listing(html: &str) -> Listing {
    let document = Html::parse_document(html);
    let text = element_text(document.root_element());
    let lang = lang::detect(&text, SCHOLARSHIP_KEYWORDS);
    let keywords = rules_for(lang).map(|r| r.title_keywords).unwrap_or(&[]);

    Listing {
        lang,
        candidates: discover(&document, keywords),
    }
}

fn discover(document: &Html, keywords: &[&str]) -> Vec<Candidate> {
    let mut found: Vec<Candidate> = Vec::new();
    let mut push = |title: String, details: String| {
        if is_title(&title) && !found.iter().any(|c| c.title == title) {
            found.push(Candidate { title, details });
        }
    };

    let mentions_keyword = |text: &str| {
        let lower = text.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    };

    if let Some(sel) = selector("li") {
        for item in document.select(&sel) {
            let text = element_text(item);
            if mentions_keyword(&text) {
                push(text, details_after(item));
            }
        }
    }

    if let Some(sel) = selector("h3, h4, h5, strong, b") {
        for heading in document.select(&sel) {
            let text = element_text(heading);
            if mentions_keyword(&text) {
                push(text, details_after(heading));
            }
        }
    }

    if let Some(sel) = selector("div[class], section[class]") {
        let heading_sel = selector("h3, h4, h5, strong, b");
        let paragraph_sel = selector("p");
        for block in document.select(&sel) {
            let class = block.value().attr("class").unwrap_or_default().to_lowercase();
            if !SCHOLARSHIP_CLASS_HINTS.iter().any(|hint| class.contains(hint)) {
                continue;
            }
            let heading = heading_sel
                .as_ref()
                .and_then(|s| block.select(s).next())
                .map(element_text);
            let title = heading.or_else(|| {
                paragraph_sel
                    .as_ref()
                    .and_then(|s| block.select(s).next())
                    .map(|p| first_sentence(&element_text(p)))
            });
            if let Some(title) = title {
                push(title, element_text(block));
            }
        }
    }

    found
}

/// Text describing the element: its own text and that of the next element
///
/// Inline emphasis (`strong`, `b`) is widened to its enclosing block first.
fn details_after(element: ElementRef<'_>) -> String {
    let anchor = match element.value().name() {
        "strong" | "b" => element
            .parent()
            .and_then(ElementRef::wrap)
            .unwrap_or(element),
        _ => element,
    };
    let mut details = element_text(anchor);
    if let Some(next) = anchor.next_siblings().find_map(ElementRef::wrap) {
        details.push(' ');
        details.push_str(&element_text(next));
    }
    collapse_whitespace(&details)
}

fn first_sentence(text: &str) -> String {
    match text.split_once('.') {
        Some((head, _)) => format!("{}.", head.trim()),
        None => text.trim().to_string(),
    }
}

/// Plausible scholarship title: 5..100 characters, not a notice
pub fn is_title(text: &str) -> bool {
    let chars = text.chars().count();
    let lower = text.to_lowercase();
    chars > TITLE_MIN_CHARS
        && chars < TITLE_MAX_CHARS
        && !NOTICE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Builds a scholarship record from a discovered candidate
pub fn parse_candidate(
    candidate: &Candidate,
    lang: Language,
    ctx: &UniversityContext,
    page_url: &str,
    country_currency: &str,
) -> Scholarship {
    let mut record = Scholarship {
        scholarship_id: scholarship_id(&candidate.title, &ctx.name),
        univ_id: ctx.univ_id.clone(),
        name: candidate.title.clone(),
        website: Some(page_url.to_string()),
        ..Default::default()
    };

    let details = candidate.details.as_str();
    if details.chars().count() < 10 {
        return record;
    }
    let lower = details.to_lowercase();

    if let Some(rules) = rules_for(lang) {
        record.funding_type = rules::lookup(&lower, rules.funding_types).map(str::to_string);
        record.eligibility = rules
            .eligibility
            .first(details)
            .map(|e| truncate(&e, ELIGIBILITY_MAX_CHARS));
        record.application_deadline = rules.deadline.first(details);
        record.number_of_awards = rules.awards.first(details);
        record.renewal_conditions = rules.renewal.first(details);
        record.selection_process = rules.selection.first(details);
    }

    if let Some((amount, currency)) = find_amount(details, country_currency) {
        record.amount = Some(amount);
        record.currency = Some(currency);
    }
    record.competitiveness = competitiveness(&lower).map(str::to_string);
    record.contact_email = find_email(details);
    if record.contact_email.is_some() {
        record.contact_person = CONTACT_PERSON.first(details);
    }

    record
}

/// Competitiveness tier named by the wording of `text_lower`
pub fn competitiveness(text_lower: &str) -> Option<&'static str> {
    COMPETITIVENESS
        .iter()
        .find(|(_, indicators)| rules::contains_any(text_lower, indicators))
        .map(|(tier, _)| *tier)
}

/// Earliest amount in `text` that is framed as a scholarship amount
///
/// Numbers that read as years are skipped. The currency comes from a code
/// right after the number, else the symbol before it, else the country.
pub fn find_amount(text: &str, country_currency: &str) -> Option<(String, String)> {
    let re = AMOUNT.as_ref()?;
    re.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let amount = caps.get(2)?.as_str();
        let symbol = caps.get(1).map(|m| m.as_str());
        let code = caps.get(3).map(|m| m.as_str());

        if looks_like_year(amount) || (symbol.is_none() && code.is_none() && amount.len() < 3) {
            return None;
        }
        if !amount_in_context(text, whole.start(), whole.end()) {
            return None;
        }

        let currency = code
            .map(str::to_string)
            .or_else(|| symbol.and_then(symbol_currency))
            .unwrap_or_else(|| country_currency.to_string());
        Some((amount.to_string(), currency))
    })
}

fn looks_like_year(amount: &str) -> bool {
    amount.len() == 4
        && amount.chars().all(|c| c.is_ascii_digit())
        && (amount.starts_with("19") || amount.starts_with("20"))
}

fn symbol_currency(symbol: &str) -> Option<String> {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, code)| code.to_string())
}

fn amount_in_context(text: &str, start: usize, end: usize) -> bool {
    let before: String = text[..start]
        .chars()
        .rev()
        .take(AMOUNT_CONTEXT_CHARS)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let after: String = text[end..].chars().take(AMOUNT_CONTEXT_CHARS).collect();
    let context = format!("{} {}", before, after).to_lowercase();
    rules::contains_any(&context, AMOUNT_INDICATORS)
}

/// A catalogue scholarship added by [`top_up`]
#[derive(Debug, Clone, Copy)]
pub struct ToppedUp {
    pub name: &'static str,
    pub url: &'static str,
}

/// Adds catalogue scholarships for the university's country
///
/// Stops at [`MAX_SCHOLARSHIPS`] and skips names already present. Returns
/// what was added so the caller can log the references.
pub fn top_up(
    scholarships: &mut Vec<Scholarship>,
    tables: &ReferenceTables,
    ctx: &UniversityContext,
) -> Vec<ToppedUp> {
    let mut added = Vec::new();

    for entry in tables.scholarships_for(&ctx.country) {
        if scholarships.len() >= MAX_SCHOLARSHIPS {
            break;
        }
        if scholarships.iter().any(|s| s.name == entry.name) {
            continue;
        }
        scholarships.push(Scholarship {
            scholarship_id: scholarship_id(entry.name, &ctx.name),
            univ_id: ctx.univ_id.clone(),
            prog_id: None,
            name: entry.name.to_string(),
            funding_type: Some(entry.funding_type.to_string()),
            amount: Some("Varies".to_string()),
            currency: Some("USD".to_string()),
            eligibility: Some(entry.eligibility.to_string()),
            competitiveness: Some("High".to_string()),
            number_of_awards: Some("Varies".to_string()),
            application_deadline: Some("Check website".to_string()),
            notification_date: Some("Varies".to_string()),
            disbursement_schedule: Some("Per semester/year".to_string()),
            renewal_conditions: Some("Academic performance".to_string()),
            selection_process: Some("Merit-based evaluation".to_string()),
            website: Some(entry.url.to_string()),
            contact_person: Some("Scholarship Office".to_string()),
            contact_email: None,
            notes: format!("International scholarship program. {}", APPROXIMATE_NOTE),
        });
        added.push(ToppedUp {
            name: entry.name,
            url: entry.url,
        });
    }

    added
}

/// Three generic placeholder scholarships
pub fn fallback(ctx: &UniversityContext) -> Vec<Scholarship> {
    const KINDS: [(&str, &str, &str, &str, &str); 3] = [
        ("Merit Scholarship", "Full Tuition", "100%", "High", "5-10"),
        ("International Student Scholarship", "Partial Tuition", "50%", "Medium", "10-20"),
        ("Research Grant", "Research Grant", "$10,000", "Medium", "15-25"),
    ];
    let host = ctx.host();

    KINDS
        .iter()
        .map(|(kind, funding, amount, competitiveness, awards)| {
            let name = format!("{} {}", ctx.name, kind);
            Scholarship {
                scholarship_id: scholarship_id(&name, &ctx.name),
                univ_id: ctx.univ_id.clone(),
                prog_id: None,
                funding_type: Some(funding.to_string()),
                amount: Some(amount.to_string()),
                currency: Some("USD".to_string()),
                eligibility: Some(
                    "International students with excellent academic record".to_string(),
                ),
                competitiveness: Some(competitiveness.to_string()),
                number_of_awards: Some(awards.to_string()),
                application_deadline: Some("Concurrent with program application".to_string()),
                notification_date: Some("4-6 weeks after application".to_string()),
                disbursement_schedule: Some("Per semester".to_string()),
                renewal_conditions: Some("Maintain good academic standing".to_string()),
                selection_process: Some("Merit-based evaluation".to_string()),
                website: Some(format!("{}/scholarships", ctx.site())),
                contact_person: Some("Financial Aid Office".to_string()),
                contact_email: Some(format!("financial-aid@{}", host)),
                notes: APPROXIMATE_NOTE.to_string(),
                name,
            }
        })
        .collect()
}
