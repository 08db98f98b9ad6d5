//! Page language detection
//!
//! Scores page text against a keyword list per language and picks the
//! highest-scoring language, so that multilingual extractors select the right
//! keyword and pattern tables.

/// Languages with dedicated keyword tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
    German,
    Dutch,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::English, Self::Spanish, Self::German, Self::Dutch];

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::German => "de",
            Self::Dutch => "nl",
        }
    }
}

/// A keyword list per language
pub type LanguageKeywords = [(Language, &'static [&'static str])];

/// Keywords typical of research and lab pages
pub const RESEARCH_KEYWORDS: &LanguageKeywords = &[
    (Language::English, &["research", "about", "contact", "projects", "publications"]),
    (Language::Spanish, &["investigación", "acerca", "contacto", "proyectos", "publicaciones"]),
    (Language::German, &["forschung", "über", "kontakt", "projekte", "veröffentlichungen"]),
    (Language::Dutch, &["onderzoek", "over", "contact", "projecten", "publicaties"]),
];

/// Keywords typical of funding pages
pub const SCHOLARSHIP_KEYWORDS: &LanguageKeywords = &[
    (Language::English, &["scholarship", "funding", "financial aid", "grant", "fellowship", "award"]),
    (Language::Spanish, &["beca", "financiación", "ayuda", "subvención", "premio"]),
    (Language::German, &["stipendium", "finanzierung", "förderung", "beihilfe", "preis"]),
    (Language::Dutch, &["beurs", "financiering", "studiefinanciering", "toelage", "prijs"]),
];

/// Detects the dominant language of `text`
///
/// Each language scores the number of its keywords that occur in the
/// lowercased text. Ties go to the language listed first; with no hits at
/// all the first language (English) is returned.
///
/// # Example
///
/// ```
/// use uni_dossier::extract::lang::{detect, Language, RESEARCH_KEYWORDS};
///
/// let lang = detect("Grupo de investigación: proyectos y publicaciones", RESEARCH_KEYWORDS);
/// assert_eq!(lang, Language::Spanish);
/// ```
pub fn detect(text: &str, keywords: &LanguageKeywords) -> Language {
    let lower = text.to_lowercase();
    let mut best = keywords.first().map(|(lang, _)| *lang).unwrap_or(Language::English);
    let mut best_score = 0;

    for (lang, words) in keywords {
        let score = words.iter().filter(|w| lower.contains(*w)).count();
        if score > best_score {
            best = *lang;
            best_score = score;
        }
    }

    best
}

/// Keyword list for `lang`, falling back to English
pub fn keywords_for(table: &LanguageKeywords, lang: Language) -> &'static [&'static str] {
    table
        .iter()
        .find(|(l, _)| *l == lang)
        .or_else(|| table.iter().find(|(l, _)| *l == Language::English))
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}
