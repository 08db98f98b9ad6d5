//! Research lab extraction
//!
//! Research listing pages are rendered (they are often built client-side),
//! their language is detected, and links under each research area are
//! followed into lab pages. Each lab page is mined with the rule table of the
//! detected language.

use super::lang::{self, Language, RESEARCH_KEYWORDS};
use super::rules::{self, truncate, FieldRules, Transform};
use super::tables::PathLocale;
use super::{candidate_paths, find_email, ExtractEnv, UniversityContext, Visited};
use crate::crawler::Page;
use crate::records::{generate_id, IdKind, Lab, APPROXIMATE_NOTE};
use crate::url::join_path;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

/// A research area and its terms per language
#[derive(Debug, Clone, Copy)]
pub struct ResearchArea {
    pub name: &'static str,
    pub terms: &'static [(Language, &'static [&'static str])],
}

impl ResearchArea {
    /// Terms for `lang`, falling back to English
    pub fn terms_for(&self, lang: Language) -> &'static [&'static str] {
        lang::keywords_for(self.terms, lang)
    }
}

pub const RESEARCH_AREAS: &[ResearchArea] = &[
    ResearchArea {
        name: "Artificial Intelligence",
        terms: &[
            (Language::English, &["artificial intelligence", "machine learning", "deep learning", "neural networks", "ai"]),
            (Language::Spanish, &["inteligencia artificial", "aprendizaje automático", "aprendizaje profundo", "redes neuronales", "ia"]),
            (Language::German, &["künstliche intelligenz", "maschinelles lernen", "deep learning", "neuronale netze", "ki"]),
            (Language::Dutch, &["kunstmatige intelligentie", "machine learning", "deep learning", "neurale netwerken", "ai"]),
        ],
    },
    ResearchArea {
        name: "Data Science",
        terms: &[
            (Language::English, &["data science", "big data", "analytics", "data mining", "data visualization"]),
            (Language::Spanish, &["ciencia de datos", "grandes datos", "analítica", "minería de datos", "visualización de datos"]),
            (Language::German, &["datenwissenschaft", "big data", "analytik", "data mining", "datenvisualisierung"]),
            (Language::Dutch, &["data science", "big data", "analytics", "data mining", "datavisualisatie"]),
        ],
    },
    ResearchArea {
        name: "Human-Computer Interaction",
        terms: &[
            (Language::English, &["human-computer interaction", "hci", "user interface", "user experience", "usability"]),
            (Language::Spanish, &["interacción persona-ordenador", "ipo", "interfaz de usuario", "experiencia de usuario", "usabilidad"]),
            (Language::German, &["mensch-computer-interaktion", "hci", "benutzeroberfläche", "nutzererfahrung", "benutzerfreundlichkeit"]),
            (Language::Dutch, &["mens-computer interactie", "hci", "gebruikersinterface", "gebruikerservaring", "bruikbaarheid"]),
        ],
    },
    ResearchArea {
        name: "Robotics",
        terms: &[
            (Language::English, &["robotics", "autonomous systems", "robot", "automation", "mechatronics"]),
            (Language::Spanish, &["robótica", "sistemas autónomos", "robot", "automatización", "mecatrónica"]),
            (Language::German, &["robotik", "autonome systeme", "roboter", "automatisierung", "mechatronik"]),
            (Language::Dutch, &["robotica", "autonome systemen", "robot", "automatisering", "mechatronica"]),
        ],
    },
    ResearchArea {
        name: "Computer Vision",
        terms: &[
            (Language::English, &["computer vision", "image processing", "visual recognition", "object detection", "pattern recognition"]),
            (Language::Spanish, &["visión por computador", "procesamiento de imágenes", "reconocimiento visual", "detección de objetos"]),
            (Language::German, &["computer vision", "bildverarbeitung", "visuelle erkennung", "objekterkennung", "mustererkennung"]),
            (Language::Dutch, &["computer vision", "beeldverwerking", "visuele herkenning", "objectdetectie", "patroonherkenning"]),
        ],
    },
    ResearchArea {
        name: "Natural Language Processing",
        terms: &[
            (Language::English, &["natural language processing", "nlp", "computational linguistics", "text mining", "language understanding"]),
            (Language::Spanish, &["procesamiento del lenguaje natural", "pln", "lingüística computacional", "minería de texto"]),
            (Language::German, &["natürliche sprachverarbeitung", "nlp", "computerlinguistik", "text mining", "sprachverständnis"]),
            (Language::Dutch, &["natuurlijke taalverwerking", "nlp", "computationele taalkunde", "text mining", "taalbegrip"]),
        ],
    },
    ResearchArea {
        name: "Cybersecurity",
        terms: &[
            (Language::English, &["cybersecurity", "security", "cryptography", "privacy", "network security"]),
            (Language::Spanish, &["ciberseguridad", "seguridad", "criptografía", "privacidad", "seguridad de redes"]),
            (Language::German, &["cybersicherheit", "sicherheit", "kryptographie", "datenschutz", "netzwerksicherheit"]),
            (Language::Dutch, &["cybersecurity", "beveiliging", "cryptografie", "privacy", "netwerkbeveiliging"]),
        ],
    },
];

/// Labs kept per research area
pub const MAX_PER_AREA: usize = 2;

/// Real plus placeholder labs emitted at minimum
pub const MIN_LABS: usize = 3;

const LISTING_PATHS: &[&str] = &[
    "/research", "/labs", "/centers", "/institutes", "/groups", "/faculty/research",
    "/departments", "/research-groups", "/research-centers", "/innovation", "/en/research",
    "/en/labs", "/en/centers", "/en/institutes", "/investigacion", "/laboratorios", "/centros",
    "/institutos", "/grupos", "/forschung", "/labore", "/zentren", "/institute", "/onderzoek",
    "/laboratoria", "/centra", "/instituten",
];

const LOCALIZED_LISTING_PATHS: &[(PathLocale, &[&str])] = &[
    (
        PathLocale::Spanish,
        &["/grupos-investigacion", "/centros-investigacion", "/unidades-investigacion", "/servicios/investigacion"],
    ),
    (
        PathLocale::German,
        &["/forschungsgruppen", "/forschungszentren", "/arbeitsgruppen", "/lehrstuehle"],
    ),
    (
        PathLocale::LatinAmerican,
        &["/grupos-de-investigacion", "/centros-de-investigacion", "/investigadores", "/posgrado/investigacion"],
    ),
];

const KNOWN_INDUSTRY_PARTNERS: &[&str] = &[
    "google", "microsoft", "amazon", "ibm", "nvidia", "intel", "apple", "facebook", "meta",
    "oracle", "siemens", "bosch", "philips", "samsung", "huawei",
];

const STUDENT_POSITIONS_AVAILABLE: &str = "Yes - Contact for details";

/// Compiled extraction rules for lab pages in one language
pub struct LabRules {
    team_keywords: &'static [&'static str],
    department: FieldRules,
    director: FieldRules,
    projects: FieldRules,
    funding: FieldRules,
    industry: FieldRules,
    facilities: FieldRules,
    publications: FieldRules,
    positions: FieldRules,
}

/// Title and name of a researcher, e.g. `Prof. Ada Lovelace`
const TITLED_NAME: &str =
    r"\b(?:Prof\.|Professor|Dr\.)\s+\p{Lu}[\p{L}.\-]+(?:\s\p{Lu}[\p{L}.\-]+){0,3}";

static RULES: LazyLock<HashMap<Language, LabRules>> = LazyLock::new(|| {
    HashMap::from([
        (
            Language::English,
            LabRules {
                team_keywords: &["team", "people", "members", "staff", "researchers", "faculty"],
                department: FieldRules::new(&[
                    (r"(?i:department|faculty|school) of (\p{Lu}[\p{L}&]*(?:\s(?:and|of|&|\p{Lu}[\p{L}&]*))*)", unit_name as Transform),
                    (r"(\p{Lu}[\p{L}&]*(?:\s(?:and|&|\p{Lu}[\p{L}&]*))*) (?:Department|Faculty|School)\b", unit_name),
                ]),
                director: FieldRules::new(&[
                    (r"(?i:director|head|lead|principal investigator)[:\s]+((?:Prof\. |Dr\. )?\p{Lu}[\p{L}.\-]+(?:\s\p{Lu}[\p{L}.\-]+){1,3})", person_name as Transform),
                    (TITLED_NAME, rules::whole),
                ]),
                projects: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:active\s+|ongoing\s+)?(?:projects?|research projects)", rules::first_digits as Transform),
                    (r"(?i)(?:projects?|ongoing research|active (?:projects|research))[:\s]+(\d+)", rules::first_digits),
                ]),
                funding: FieldRules::new(&[(
                    r"(?i)(?:funding|grants?|budget)[:\s]*(?:of\s)?([$€£])?\s?(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s?(million|k|m)?\b\s?(USD|EUR|GBP)?",
                    funding_usd as Transform,
                )]),
                industry: FieldRules::new(&[
                    (r"(?i)(?:industry|companies|corporate|partnership)[:\s]+([^.]+)", industry_partners as Transform),
                    (r"(?i)collaborat\w* with ([^.]+)", industry_partners),
                ]),
                facilities: FieldRules::new(&[(
                    r"(?i)(?:facilities|equipment|infrastructure|resources|labs)[:\s]+([^.]{6,})",
                    short_text as Transform,
                )]),
                publications: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:publications|papers|articles)\s+(?:per year|annually|each year)", rules::first_digits as Transform),
                    (r"(?i)(?:publish|produce)\s+(\d+)\s+(?:publications|papers|articles)", rules::first_digits),
                    (r"(?i)(?:publications|papers|articles)[:\s]+(\d+)\s+(?:per year|annually)", rules::first_digits),
                ]),
                positions: FieldRules::group(
                    &[
                        r"(?i)student positions|positions available|openings|vacancies",
                        r"(?i)(?:looking for|seeking|recruiting)\s+(?:students|candidates|applicants)",
                        r"(?i)(?:opportunities for|positions for)\s+(?:students|graduates|phd)",
                    ],
                    0,
                ),
            },
        ),
        (
            Language::Spanish,
            LabRules {
                team_keywords: &["equipo", "personas", "miembros", "personal", "investigadores", "facultad"],
                department: FieldRules::new(&[
                    (r"(?i:departamento|facultad|escuela) de (\p{Lu}[\p{L}&]*(?:\s(?:y|de|&|\p{Lu}[\p{L}&]*))*)", unit_name as Transform),
                ]),
                director: FieldRules::new(&[
                    (r"(?i:director|directora|jefe|responsable|investigador principal)[:\s]+((?:Prof\. |Dr\. |Dra\. )?\p{Lu}[\p{L}.\-]+(?:\s\p{Lu}[\p{L}.\-]+){1,3})", person_name as Transform),
                    (TITLED_NAME, rules::whole),
                ]),
                projects: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:proyectos?|investigaciones en curso)", rules::first_digits as Transform),
                    (r"(?i)(?:proyectos?|investigaciones en curso)[:\s]+(\d+)", rules::first_digits),
                ]),
                funding: FieldRules::new(&[(
                    r"(?i)(?:financiamiento|financiación|presupuesto|subvención)[:\s]*(?:de\s)?([$€£])?\s?(\d{1,3}(?:[.,]\d{3})+|\d+(?:\.\d+)?)\s?(millones|k|m)?\b\s?(USD|EUR|GBP)?",
                    funding_usd as Transform,
                )]),
                industry: FieldRules::new(&[
                    (r"(?i)(?:industria|empresas|corporativo|asociación)[:\s]+([^.]+)", industry_partners as Transform),
                    (r"(?i)colabora\w* con ([^.]+)", industry_partners),
                ]),
                facilities: FieldRules::new(&[(
                    r"(?i)(?:instalaciones|equipamiento|infraestructura|recursos|laboratorios)[:\s]+([^.]{6,})",
                    short_text as Transform,
                )]),
                publications: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:publicaciones|artículos|papers)\s+(?:por año|anualmente)", rules::first_digits as Transform),
                    (r"(?i)(?:publica|produce)\s+(\d+)\s+(?:publicaciones|artículos|papers)", rules::first_digits),
                ]),
                positions: FieldRules::group(
                    &[
                        r"(?i)posiciones para estudiantes|plazas disponibles|vacantes",
                        r"(?i)(?:buscando|reclutando)\s+(?:estudiantes|candidatos)",
                    ],
                    0,
                ),
            },
        ),
        (
            Language::German,
            LabRules {
                team_keywords: &["team", "personen", "mitglieder", "mitarbeiter", "forscher", "fakultät"],
                department: FieldRules::new(&[
                    (r"(?i:fachbereich|fakultät|institut) für (\p{Lu}[\p{L}&]*(?:\s(?:und|&|\p{Lu}[\p{L}&]*))*)", unit_name as Transform),
                ]),
                director: FieldRules::new(&[
                    (r"(?i:leiter|leiterin|direktor|leitung)[:\s]+((?:Prof\. |Dr\. )*\p{Lu}[\p{L}.\-]+(?:\s\p{Lu}[\p{L}.\-]+){1,3})", person_name as Transform),
                    (TITLED_NAME, rules::whole),
                ]),
                projects: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:laufende\s+|aktive\s+)?projekte?", rules::first_digits as Transform),
                    (r"(?i)projekte?[:\s]+(\d+)", rules::first_digits),
                ]),
                funding: FieldRules::new(&[(
                    r"(?i)(?:finanzierung|förderung|budget)[:\s]*(?:von\s)?([$€£])?\s?(\d{1,3}(?:[.,]\d{3})+|\d+(?:,\d+)?)\s?(millionen|mio\.?|k|m)?\b\s?(USD|EUR|GBP)?",
                    funding_usd as Transform,
                )]),
                industry: FieldRules::new(&[
                    (r"(?i)(?:industrie|unternehmen|partnerschaft)[:\s]+([^.]+)", industry_partners as Transform),
                    (r"(?i)zusammenarbeit mit ([^.]+)", industry_partners),
                ]),
                facilities: FieldRules::new(&[(
                    r"(?i)(?:einrichtungen|ausstattung|ausrüstung|infrastruktur|labore)[:\s]+([^.]{6,})",
                    short_text as Transform,
                )]),
                publications: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:publikationen|veröffentlichungen|artikel)\s+(?:pro jahr|jährlich)", rules::first_digits as Transform),
                ]),
                positions: FieldRules::group(
                    &[
                        r"(?i)offene stellen|studentische stellen|hilfskräfte gesucht",
                        r"(?i)(?:suchen|rekrutieren)\s+(?:studierende|kandidaten|bewerber)",
                    ],
                    0,
                ),
            },
        ),
        (
            Language::Dutch,
            LabRules {
                team_keywords: &["team", "mensen", "leden", "personeel", "onderzoekers", "faculteit"],
                department: FieldRules::new(&[
                    (r"(?i:afdeling|faculteit) (?:van|der) (\p{Lu}[\p{L}&]*(?:\s(?:en|&|\p{Lu}[\p{L}&]*))*)", unit_name as Transform),
                ]),
                director: FieldRules::new(&[
                    (r"(?i:directeur|hoofd|leider)[:\s]+((?:Prof\. |Dr\. )?\p{Lu}[\p{L}.\-]+(?:\s\p{Lu}[\p{L}.\-]+){1,3})", person_name as Transform),
                    (TITLED_NAME, rules::whole),
                ]),
                projects: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:lopende\s+)?projecten", rules::first_digits as Transform),
                ]),
                funding: FieldRules::new(&[(
                    r"(?i)(?:financiering|subsidie|budget)[:\s]*(?:van\s)?([$€£])?\s?(\d{1,3}(?:[.,]\d{3})+|\d+(?:,\d+)?)\s?(miljoen|k|m)?\b\s?(USD|EUR|GBP)?",
                    funding_usd as Transform,
                )]),
                industry: FieldRules::new(&[
                    (r"(?i)(?:industrie|bedrijven|partnerschap)[:\s]+([^.]+)", industry_partners as Transform),
                    (r"(?i)samenwerking met ([^.]+)", industry_partners),
                ]),
                facilities: FieldRules::new(&[(
                    r"(?i)(?:faciliteiten|apparatuur|infrastructuur|laboratoria)[:\s]+([^.]{6,})",
                    short_text as Transform,
                )]),
                publications: FieldRules::new(&[
                    (r"(?i)\b(\d+)\s+(?:publicaties|artikelen)\s+(?:per jaar|jaarlijks)", rules::first_digits as Transform),
                ]),
                positions: FieldRules::group(
                    &[
                        r"(?i)vacatures|studentposities|beschikbare posities",
                        r"(?i)(?:op zoek naar|werven)\s+(?:studenten|kandidaten)",
                    ],
                    0,
                ),
            },
        ),
    ])
});

static TITLED_NAME_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(TITLED_NAME).ok());

/// Rules for `lang`
pub fn rules_for(lang: Language) -> Option<&'static LabRules> {
    RULES.get(&lang).or_else(|| RULES.get(&Language::English))
}

fn unit_name(caps: &Captures<'_>) -> Option<String> {
    rules::first_group(caps).filter(|name| (4..50).contains(&name.chars().count()))
}

fn person_name(caps: &Captures<'_>) -> Option<String> {
    rules::first_group(caps).filter(|name| name.contains(' ') && (6..40).contains(&name.chars().count()))
}

fn short_text(caps: &Captures<'_>) -> Option<String> {
    rules::first_group(caps)
        .filter(|text| text.chars().count() > 5)
        .map(|text| truncate(&text, 100))
}

fn industry_partners(caps: &Captures<'_>) -> Option<String> {
    let text = rules::first_group(caps)?;
    let lower = text.to_lowercase();
    let plausible = text.chars().count() > 5
        && (lower.contains("industry")
            || lower.contains("compan")
            || rules::contains_any(&lower, KNOWN_INDUSTRY_PARTNERS));
    plausible.then(|| truncate(&text, 100))
}

/// Converts a funding match to whole US dollars with thousands separators
fn funding_usd(caps: &Captures<'_>) -> Option<String> {
    let matched = caps.get(0)?.as_str();
    let amount = parse_amount(caps.get(2)?.as_str())?;

    let multiplier = match caps.get(3).map(|m| m.as_str().to_lowercase()) {
        Some(m) if m == "k" => 1_000.0,
        Some(m) if m.starts_with('m') => 1_000_000.0,
        _ => 1.0,
    };

    let upper = matched.to_uppercase();
    let rate = if matched.contains('€') || upper.contains("EUR") {
        1.1
    } else if matched.contains('£') || upper.contains("GBP") {
        1.3
    } else {
        1.0
    };

    let usd = amount * multiplier * rate;
    (usd >= 1_000.0).then(|| group_thousands(usd.round() as u64))
}

/// Parses `1,250,000`, `1.250.000`, `2.5` or `2,5` into a number
fn parse_amount(raw: &str) -> Option<f64> {
    let separators = raw.matches([',', '.']).count();
    let grouped = raw
        .rsplit([',', '.'])
        .next()
        .is_some_and(|tail| tail.len() == 3 && separators > 0);
    let cleaned = if grouped {
        raw.replace([',', '.'], "")
    } else {
        raw.replace(',', ".")
    };
    cleaned.parse().ok()
}

/// `1234567` as `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whether a research term occurs in `text_lower`
///
/// Terms of up to three characters (acronyms such as "ai" or "nlp") must
/// occur as whole words.
fn term_matches(text_lower: &str, term: &str) -> bool {
    if term.chars().count() <= 3 {
        text_lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == term)
    } else {
        text_lower.contains(term)
    }
}

/// Identifier of a lab within a university
pub fn lab_id(lab_name: &str, university: &str) -> String {
    generate_id(IdKind::Lab, &[lab_name, university])
}

/// Extracts the university's research labs
///
/// # Returns
///
/// At least [`MIN_LABS`] records, padded with placeholders
pub async fn extract(env: &ExtractEnv, ctx: &UniversityContext) -> Vec<Lab> {
    tracing::info!("Extracting research labs for {}", ctx.name);

    let mut labs: Vec<Lab> = Vec::new();
    let mut visited = Visited::new();

    let locale = env.tables.country(&ctx.country).and_then(|p| p.locale);
    let listing_paths = candidate_paths(LISTING_PATHS, LOCALIZED_LISTING_PATHS, locale, &[]);
    let capacity = RESEARCH_AREAS.len() * MAX_PER_AREA;

    for path in listing_paths {
        if labs.len() >= capacity {
            break;
        }
        let Some(url) = join_path(&ctx.base_url, path) else {
            continue;
        };
        if !visited.insert(&url) {
            continue;
        }
        let Some(listing) = env.rendered_page(&url, None).await else {
            continue;
        };

        let lang = lang::detect(&listing.text, RESEARCH_KEYWORDS);
        tracing::debug!("Research listing {} detected as {}", url, lang.code());

        for area in RESEARCH_AREAS {
            for (link, link_text) in area_links(&listing, area, lang) {
                if count_of(&labs, area) >= MAX_PER_AREA {
                    break;
                }
                if !visited.insert(&link) {
                    continue;
                }
                let Some(page) = env.page(&link).await else {
                    continue;
                };
                if let Some(lab) = parse_lab(&page, ctx, area, lang, &link_text) {
                    env.cite(ctx, &format!("Laboratory: {}", lab.name), &link);
                    labs.push(lab);
                }
            }
        }
    }

    if labs.len() < MIN_LABS {
        tracing::warn!(
            "Only {} labs found for {}, padding with placeholders",
            labs.len(),
            ctx.name
        );
        pad_with_placeholders(&mut labs, ctx);
    }

    labs
}

fn count_of(labs: &[Lab], area: &ResearchArea) -> usize {
    labs.iter()
        .filter(|lab| lab.research_fields.as_deref() == Some(area.name))
        .count()
}

/// Links on a listing page that lead to labs in `area`, with their anchor text
pub fn area_links(listing: &Page, area: &ResearchArea, lang: Language) -> Vec<(Url, String)> {
    let mut found: Vec<(Url, String)> = Vec::new();
    let mut push = |url: &Url, text: &str| {
        if !found.iter().any(|(u, _)| u == url) {
            found.push((url.clone(), text.to_string()));
        }
    };

    for term in area.terms_for(lang) {
        for link in &listing.links {
            if term_matches(&link.text.to_lowercase(), term) {
                push(&link.url, &link.text);
            }
        }
        for heading in listing.headings.iter().filter(|h| h.level <= 4) {
            if term_matches(&heading.text.to_lowercase(), term) {
                for link in &heading.section_links {
                    push(&link.url, &link.text);
                }
            }
        }
    }
    found
}

/// Builds a lab record from its page; `None` if no usable name is found
pub fn parse_lab(
    page: &Page,
    ctx: &UniversityContext,
    area: &ResearchArea,
    lang: Language,
    link_text: &str,
) -> Option<Lab> {
    let name = lab_name(page, &ctx.name, link_text)?;
    let rules = rules_for(lang)?;
    let text = &page.text;

    let researchers = key_researchers(page, rules);

    Some(Lab {
        lab_id: lab_id(&name, &ctx.name),
        univ_id: ctx.univ_id.clone(),
        prog_id: None,
        department: rules.department.first(text),
        research_fields: Some(area.name.to_string()),
        website: Some(page.url.to_string()),
        director: rules.director.first(text),
        contact_email: find_email(text),
        key_researchers: (!researchers.is_empty()).then(|| researchers.join(", ")),
        location: None,
        active_projects: rules.projects.first(text),
        grant_funding_usd: rules.funding.first(text),
        industry_collaborations: rules.industry.first(text),
        facilities: rules.facilities.first(text),
        annual_publications: rules.publications.first(text),
        student_positions: rules
            .positions
            .matches(text)
            .then(|| STUDENT_POSITIONS_AVAILABLE.to_string()),
        ranking: None,
        notes: String::new(),
        name,
    })
}

/// Lab name from the page title (site suffixes removed), a main heading or
/// the link text, in that order
fn lab_name(page: &Page, university: &str, link_text: &str) -> Option<String> {
    let suffixes = [
        format!(" - {}", university),
        format!(" | {}", university),
        " - Research".to_string(),
        " | Research".to_string(),
        " - Home".to_string(),
        " | Home".to_string(),
    ];

    let from_title = page.title.as_deref().map(|title| {
        let mut name = title.trim().to_string();
        for suffix in &suffixes {
            if let Some(stripped) = name.strip_suffix(suffix.as_str()) {
                name = stripped.trim().to_string();
            }
        }
        name
    });

    let usable = |s: &str| s.chars().count() >= 3;

    from_title
        .filter(|n| usable(n.as_str()))
        .or_else(|| {
            page.headings
                .iter()
                .filter(|h| h.level <= 2)
                .map(|h| h.text.clone())
                .find(|t| t.chars().count() > 3)
        })
        .or_else(|| Some(link_text.trim().to_string()).filter(|n| usable(n.as_str())))
}

/// Up to five titled names, from a team section when one exists
fn key_researchers(page: &Page, rules: &LabRules) -> Vec<String> {
    let Some(re) = TITLED_NAME_RE.as_ref() else {
        return Vec::new();
    };

    let team_text = page
        .headings
        .iter()
        .find(|h| {
            let lower = h.text.to_lowercase();
            rules.team_keywords.iter().any(|k| lower.contains(k))
        })
        .map(|h| h.section_text.as_str());

    let mut names: Vec<String> = Vec::new();
    for source in team_text.into_iter().chain(std::iter::once(page.text.as_str())) {
        for m in re.find_iter(source) {
            let name = m.as_str().trim().to_string();
            if name.chars().count() > 5 && !names.contains(&name) {
                names.push(name);
            }
            if names.len() >= 5 {
                return names;
            }
        }
        if !names.is_empty() {
            break;
        }
    }
    names
}

/// Placeholder labs for a university with no discoverable labs
pub fn fallback(ctx: &UniversityContext) -> Vec<Lab> {
    let mut labs = Vec::new();
    pad_with_placeholders(&mut labs, ctx);
    labs
}

/// Adds placeholder labs for uncovered areas until [`MIN_LABS`] are present
pub fn pad_with_placeholders(labs: &mut Vec<Lab>, ctx: &UniversityContext) {
    let missing = MIN_LABS.saturating_sub(labs.len());
    let uncovered: Vec<&ResearchArea> = RESEARCH_AREAS
        .iter()
        .filter(|area| count_of(labs, area) == 0)
        .take(missing)
        .collect();

    let site = ctx.site();
    let host = ctx.base_url.host_str().unwrap_or_default().to_string();

    for area in uncovered {
        let name = format!("{} {} Research Group", ctx.name, area.name);
        labs.push(Lab {
            lab_id: lab_id(&name, &ctx.name),
            univ_id: ctx.univ_id.clone(),
            prog_id: None,
            department: Some("Computer Science & Engineering".to_string()),
            research_fields: Some(area.name.to_string()),
            website: Some(format!("{}/research", site)),
            director: None,
            contact_email: Some(format!("research@{}", host)),
            key_researchers: None,
            location: Some("Main Campus".to_string()),
            active_projects: Some("3-5".to_string()),
            grant_funding_usd: None,
            industry_collaborations: Some("Various technology companies".to_string()),
            facilities: Some("Research equipment and computing resources".to_string()),
            annual_publications: Some("5-10".to_string()),
            student_positions: Some("Contact for information".to_string()),
            ranking: None,
            notes: APPROXIMATE_NOTE.to_string(),
            name,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UniversityTarget;

    fn ctx() -> UniversityContext {
        let target = UniversityTarget {
            name: "Example University".to_string(),
            city: "Munich".to_string(),
            country: "Alemania".to_string(),
            base_url: Url::parse("https://example.edu/").unwrap(),
        };
        UniversityContext::new(&target, "UNIV0000ABCD")
    }

    fn page(url: &str, html: &str) -> Page {
        Page::parse(&Url::parse(url).unwrap(), html)
    }

    #[test]
    fn test_parse_english_lab_page() {
        let html = r#"<html><head><title>Vision Lab - Example University</title></head><body>
            <p>Part of the Department of Computer Science.</p>
            <p>Director: Jane Smith</p>
            <p>12 active projects are running with funding of €2.5 million.</p>
            <p>We collaborate with Google and Siemens on perception.</p>
            <p>Facilities: GPU cluster and motion capture studio.</p>
            <p>We publish 40 papers per year.</p>
            <div><h2>Our team</h2><p>Prof. Alan Turing, Dr. Grace Hopper</p></div>
            <p>Open PhD positions available. Contact vision@example.edu</p>
        </body></html>"#;
        let lab = parse_lab(
            &page("https://example.edu/vision", html),
            &ctx(),
            &RESEARCH_AREAS[4],
            Language::English,
            "Vision",
        )
        .unwrap();

        assert_eq!(lab.name, "Vision Lab");
        assert_eq!(lab.univ_id, "UNIV0000ABCD");
        assert_eq!(lab.department.as_deref(), Some("Computer Science"));
        assert_eq!(lab.director.as_deref(), Some("Jane Smith"));
        assert_eq!(lab.active_projects.as_deref(), Some("12"));
        assert_eq!(lab.grant_funding_usd.as_deref(), Some("2,750,000"));
        assert!(lab.industry_collaborations.unwrap().contains("Google"));
        assert!(lab.facilities.unwrap().starts_with("GPU cluster"));
        assert_eq!(lab.annual_publications.as_deref(), Some("40"));
        assert_eq!(lab.key_researchers.as_deref(), Some("Prof. Alan Turing, Dr. Grace Hopper"));
        assert_eq!(lab.student_positions.as_deref(), Some(STUDENT_POSITIONS_AVAILABLE));
        assert_eq!(lab.contact_email.as_deref(), Some("vision@example.edu"));
        assert_eq!(lab.research_fields.as_deref(), Some("Computer Vision"));
    }

    #[test]
    fn test_parse_german_lab_page() {
        let html = r#"<html><head><title>Lehrstuhl für Robotik</title></head><body>
            <p>Fakultät für Informatik</p>
            <p>7 laufende Projekte.</p>
            <p>Leitung: Prof. Dr. Klaus Weber</p>
        </body></html>"#;
        let lab = parse_lab(
            &page("https://example.edu/robotik", html),
            &ctx(),
            &RESEARCH_AREAS[3],
            Language::German,
            "",
        )
        .unwrap();

        assert_eq!(lab.name, "Lehrstuhl für Robotik");
        assert_eq!(lab.department.as_deref(), Some("Informatik"));
        assert_eq!(lab.director.as_deref(), Some("Prof. Dr. Klaus Weber"));
        assert_eq!(lab.active_projects.as_deref(), Some("7"));
    }

    #[test]
    fn test_name_falls_back_to_link_text() {
        let lab = parse_lab(
            &page("https://example.edu/x", "<body><p>nothing</p></body>"),
            &ctx(),
            &RESEARCH_AREAS[0],
            Language::English,
            "Machine Learning Group",
        )
        .unwrap();
        assert_eq!(lab.name, "Machine Learning Group");

        let none = parse_lab(
            &page("https://example.edu/x", "<body><p>nothing</p></body>"),
            &ctx(),
            &RESEARCH_AREAS[0],
            Language::English,
            "",
        );
        assert!(none.is_none());
    }

    #[test]
    fn test_area_links_match_terms_and_sections() {
        let html = r#"<body>
            <a href="/ml">Machine Learning Group</a>
            <a href="/email">Email us</a>
            <div><h3>Robotics</h3><a href="/robots">Visit</a></div>
        </body>"#;
        let listing = page("https://example.edu/research", html);

        let ai = area_links(&listing, &RESEARCH_AREAS[0], Language::English);
        assert_eq!(ai.len(), 1, "short terms only match whole words");
        assert_eq!(ai[0].0.path(), "/ml");

        let robotics = area_links(&listing, &RESEARCH_AREAS[3], Language::English);
        assert_eq!(robotics[0].0.path(), "/robots");
    }

    #[test]
    fn test_funding_conversion() {
        let rules = rules_for(Language::English).unwrap();
        assert_eq!(rules.funding.first("Funding: $1,200,000").as_deref(), Some("1,200,000"));
        assert_eq!(rules.funding.first("grant of £500k").as_deref(), Some("650,000"));
        assert_eq!(rules.funding.first("budget: 12"), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(2_750_000), "2,750,000");
    }

    #[test]
    fn test_pad_with_placeholders() {
        let labs = fallback(&ctx());
        assert_eq!(labs.len(), MIN_LABS);
        assert!(labs.iter().all(|l| l.notes == APPROXIMATE_NOTE));
        assert_eq!(labs[0].name, "Example University Artificial Intelligence Research Group");
        assert_eq!(labs[0].contact_email.as_deref(), Some("research@example.edu"));

        let mut partial = vec![Lab {
            research_fields: Some("Artificial Intelligence".to_string()),
            ..Default::default()
        }];
        pad_with_placeholders(&mut partial, &ctx());
        assert_eq!(partial.len(), MIN_LABS);
        assert_eq!(partial[1].research_fields.as_deref(), Some("Data Science"));
    }
}
