//! Admission requirement extraction
//!
//! The first admissions page that can be fetched is mined for grade, test and
//! document requirements. Exactly one record is produced per university.

use super::rules::{self, truncate, FieldRules, Transform};
use super::{ExtractEnv, UniversityContext};
use crate::crawler::Page;
use crate::records::{generate_id, Admission, IdKind, APPROXIMATE_NOTE};
use regex::Captures;
use std::sync::LazyLock;

const CANDIDATE_PATHS: &[&str] = &[
    "/admissions",
    "/apply",
    "/graduate/admissions",
    "/graduate/apply",
    "/international/requirements",
    "/requirements",
    "/graduate/requirements",
    "/en/admissions",
    "/admision",
    "/zulassung",
    "/toelating",
];

/// Exams recognised on admission pages, with their score patterns
const EXAMS: &[(&str, &str, &str)] = &[
    (
        "GRE",
        r"(?i)\b(?:GRE|Graduate Record Examination)\b",
        r"(?i)\bGRE\s+(?:(?:minimum|required)\s+)?(?:score\s+(?:of\s+)?)?(\d{3})\b",
    ),
    (
        "GMAT",
        r"(?i)\b(?:GMAT|Graduate Management Admission Test)\b",
        r"(?i)\bGMAT\s+(?:(?:minimum|required)\s+)?(?:score\s+(?:of\s+)?)?(\d{3})\b",
    ),
    (
        "TOEFL",
        r"(?i)\b(?:TOEFL|Test of English as a Foreign Language)\b",
        r"(?i)\bTOEFL(?:\s+iBT)?\s+(?:(?:minimum|required)\s+)?(?:score\s+(?:of\s+)?)?(\d{2,3})\b",
    ),
    (
        "IELTS",
        r"(?i)\b(?:IELTS|International English Language Testing System)\b",
        r"(?i)\bIELTS\s+(?:(?:minimum|required)\s+)?(?:score\s+(?:of\s+)?)?(\d(?:\.\d)?)\b",
    ),
];

const FEE_RATES_TO_USD: &[(&str, f64)] = &[("$", 1.0), ("€", 1.1), ("£", 1.3), ("¥", 0.0068)];

struct ExamRules {
    name: &'static str,
    mention: FieldRules,
    score: FieldRules,
}

static EXAM_RULES: LazyLock<Vec<ExamRules>> = LazyLock::new(|| {
    EXAMS
        .iter()
        .map(|&(name, mention, score)| ExamRules {
            name,
            mention: FieldRules::group(&[mention], 0),
            score: FieldRules::group(&[score], 1),
        })
        .collect()
});

static GPA: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (r"(?i)(?:minimum|required)\s+GPA\s+(?:of\s+)?(\d{1,2}\.\d{1,2})", gpa_value as Transform),
        (r"(?i)GPA\s+(?:of\s+)?(\d{1,2}\.\d{1,2})\s+or\s+(?:above|higher)", gpa_value),
        (r"(?i)GPA\s*[:=]\s*(\d{1,2}\.\d{1,2})", gpa_value),
    ])
});

static TEST_VALIDITY: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[r"(?i)\b(?:TOEFL|IELTS)\b.{0,120}?valid for (\d+) years?"],
        1,
    )
});

static LETTERS: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[(
        r"(?i)\b(\d|one|two|three|four)\b[^.]{0,40}?letters? of (?:recommendation|reference)",
        letter_count as Transform,
    )])
});

static STATEMENT: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)statement of (?:purpose|intent|objectives)|motivation letter"], 0));

static RESUME: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)\b(?:resume|CV|curriculum vitae)\b"], 0));

static INTERVIEW: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)\binterviews?\b"], 0));

static RESEARCH_PROPOSAL: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)research proposal"], 0));

static EXPERIENCE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[
        (
            r"(?i)\b(\d+)\+?\s+years?\s+(?:of\s+)?(?:work|professional|relevant|industry)\s+experience",
            experience_years as Transform,
        ),
        (r"(?i)(?:work|professional) experience (?:is )?(preferred|recommended|desirable)", preferred),
    ])
});

static PORTFOLIO: LazyLock<FieldRules> =
    LazyLock::new(|| FieldRules::group(&[r"(?i)\bportfolio\b|writing samples?"], 0));

static DEADLINE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[r"(?i)(?:application\s+deadline|apply\s+by)[:\s]+(\p{L}+ \d{1,2}(?:st|nd|rd|th)?,? \d{4}|\d{1,2}[- /.]\d{1,2}[- /.]\d{2,4})"],
        1,
    )
});

static FEE: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[(
        r"(?i)application fee[^.\d$€£¥]{0,60}([$€£¥])?\s?(\d+(?:\.\d{2})?)",
        fee_usd as Transform,
    )])
});

static ROLLING: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::group(
        &[r"(?i)rolling admissions?|applications? (?:are )?accepted (?:on a )?rolling basis"],
        0,
    )
});

static OTHER: LazyLock<FieldRules> = LazyLock::new(|| {
    FieldRules::new(&[(
        r"(?i)(?:additional|other) requirements?[:\s]+([^.]{6,})",
        other_requirements as Transform,
    )])
});

fn gpa_value(caps: &Captures<'_>) -> Option<String> {
    let value = caps.get(1)?.as_str();
    value
        .parse::<f64>()
        .is_ok_and(|gpa| gpa > 0.0 && gpa <= 10.0)
        .then(|| value.to_string())
}

fn letter_count(caps: &Captures<'_>) -> Option<String> {
    let raw = caps.get(1)?.as_str().to_lowercase();
    let count = match raw.as_str() {
        "one" => "1",
        "two" => "2",
        "three" => "3",
        "four" => "4",
        digits => digits,
    };
    (count != "0").then(|| count.to_string())
}

fn experience_years(caps: &Captures<'_>) -> Option<String> {
    let years = caps.get(1)?.as_str();
    Some(match years {
        "1" => "1 year".to_string(),
        n => format!("{} years", n),
    })
}

fn preferred(_caps: &Captures<'_>) -> Option<String> {
    Some("Preferred".to_string())
}

/// Application fee converted to whole US dollars
fn fee_usd(caps: &Captures<'_>) -> Option<String> {
    let symbol = caps.get(1).map(|m| m.as_str()).unwrap_or("$");
    let amount: f64 = caps.get(2)?.as_str().parse().ok()?;
    let rate = FEE_RATES_TO_USD
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, rate)| *rate)
        .unwrap_or(1.0);
    let usd = (amount * rate).trunc() as u64;
    (usd > 0).then(|| usd.to_string())
}

fn other_requirements(caps: &Captures<'_>) -> Option<String> {
    rules::group1(caps).map(|text| truncate(&text, 150))
}

/// GPA scale implied by a minimum GPA value
pub fn gpa_scale(gpa: &str) -> Option<&'static str> {
    let value: f64 = gpa.parse().ok()?;
    if value <= 4.0 {
        Some("4.0")
    } else if value <= 5.0 {
        Some("5.0")
    } else if value <= 10.0 {
        Some("10.0")
    } else {
        None
    }
}

/// Identifier of a university's admission record
pub fn admission_id(university: &str) -> String {
    generate_id(IdKind::Admission, &[university])
}

/// Extracts admission requirements
///
/// # Returns
///
/// Exactly one record; the placeholder when no admissions page is found
pub async fn extract(env: &ExtractEnv, ctx: &UniversityContext) -> Admission {
    tracing::info!("Extracting admission requirements for {}", ctx.name);

    match env.probe_first(&ctx.base_url, CANDIDATE_PATHS).await {
        Some(page) => {
            env.cite(ctx, "Admission requirements", &page.url);
            parse_admission(&page, ctx)
        }
        None => {
            tracing::warn!("No admissions page for {}, using placeholder", ctx.name);
            fallback(ctx)
        }
    }
}

/// Mines an admissions page
pub fn parse_admission(page: &Page, ctx: &UniversityContext) -> Admission {
    let text = page.text.as_str();
    let yes = |rule: &FieldRules| rule.matches(text).then(|| "Yes".to_string());

    let minimum_gpa = GPA.first(text);
    let gpa_scale = minimum_gpa.as_deref().and_then(gpa_scale).map(str::to_string);

    let mut exams = Vec::new();
    let mut scores = Vec::new();
    for exam in EXAM_RULES.iter() {
        if exam.mention.matches(text) {
            exams.push(exam.name);
        }
        if let Some(score) = exam.score.first(text) {
            scores.push(format!("{}: {}", exam.name, score));
        }
    }

    Admission {
        admission_id: admission_id(&ctx.name),
        univ_id: ctx.univ_id.clone(),
        prog_id: None,
        minimum_gpa,
        gpa_scale,
        required_exams: (!exams.is_empty()).then(|| exams.join(", ")),
        minimum_scores: (!scores.is_empty()).then(|| scores.join(", ")),
        test_validity_years: TEST_VALIDITY.first(text),
        recommendation_letters: LETTERS.first(text),
        statement_of_purpose: yes(&*STATEMENT),
        resume: yes(&*RESUME),
        interview: yes(&*INTERVIEW),
        research_proposal: yes(&*RESEARCH_PROPOSAL),
        experience: EXPERIENCE.first(text),
        portfolio: yes(&*PORTFOLIO),
        application_deadline: DEADLINE.first(text),
        application_fee_usd: FEE.first(text),
        rolling_admission: Some((if ROLLING.matches(text) { "Yes" } else { "No" }).to_string()),
        other_requirements: OTHER.first(text),
        notes: String::new(),
    }
}

/// Typical graduate requirements, marked approximate
pub fn fallback(ctx: &UniversityContext) -> Admission {
    Admission {
        admission_id: admission_id(&ctx.name),
        univ_id: ctx.univ_id.clone(),
        prog_id: None,
        required_exams: Some("TOEFL, IELTS".to_string()),
        minimum_scores: Some("TOEFL: 90, IELTS: 6.5".to_string()),
        recommendation_letters: Some("2".to_string()),
        statement_of_purpose: Some("Yes".to_string()),
        resume: Some("Yes".to_string()),
        rolling_admission: Some("No".to_string()),
        notes: APPROXIMATE_NOTE.to_string(),
        ..Default::default()
    }
}
