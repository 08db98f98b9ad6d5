//! HTML page analysis
//!
//! This module turns fetched markup into an owned [`Page`] summary:
//! - Page title
//! - Visible text (scripts and styles skipped, whitespace collapsed)
//! - Links with their anchor text (absolute URLs)
//! - Headings with the links and text of their enclosing section
//!
//! `scraper::Html` is not `Send`, so extractors parse inside synchronous
//! helpers and carry only these owned summaries across await points.

use crate::crawler::fetcher::Document;
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A hyperlink and its anchor text
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub url: Url,
    pub text: String,
}

/// A heading and the section that contains it
#[derive(Debug, Clone)]
pub struct Heading {
    /// Heading level (1 for `<h1>`)
    pub level: u8,

    /// Heading text
    pub text: String,

    /// Visible text of the heading's parent element
    pub section_text: String,

    /// Links inside the heading's parent element
    pub section_links: Vec<Link>,
}

/// Owned summary of an HTML page
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub title: Option<String>,
    pub text: String,
    pub links: Vec<Link>,
    pub headings: Vec<Heading>,
}

impl Page {
    /// Parses markup retrieved from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use uni_dossier::crawler::Page;
    /// use url::Url;
    ///
    /// let html = r#"<html><head><title>Labs</title></head>
    ///     <body><h2>AI Lab</h2><a href="/ai">Artificial Intelligence</a></body></html>"#;
    /// let page = Page::parse(&Url::parse("https://example.edu/").unwrap(), html);
    /// assert_eq!(page.title.as_deref(), Some("Labs"));
    /// assert_eq!(page.links[0].url.as_str(), "https://example.edu/ai");
    /// ```
    pub fn parse(url: &Url, html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();

        Self {
            url: url.clone(),
            title: first_text(&document, "title"),
            text: visible_text(root),
            links: collect_links(root, url),
            headings: collect_headings(&document, url),
        }
    }

    /// Parses a fetched document; `None` if its URL is unusable
    pub fn from_document(doc: &Document) -> Option<Self> {
        let url = Url::parse(&doc.url).ok()?;
        Some(Self::parse(&url, &doc.body))
    }

    /// Lowercased visible text
    pub fn lower_text(&self) -> String {
        self.text.to_lowercase()
    }

    /// Links whose anchor text contains `keyword` (case-insensitive)
    pub fn links_with_text<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        let keyword = keyword.to_lowercase();
        self.links
            .iter()
            .filter(move |link| link.text.to_lowercase().contains(&keyword))
    }

    /// First heading of level 1 or 2
    pub fn main_heading(&self) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level <= 2 && !h.text.is_empty())
            .map(|h| h.text.as_str())
    }
}

/// Parses a CSS selector, logging and returning `None` on failure
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// Collapses runs of whitespace into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    visible_text(element)
}

/// Text of the first element matching `css`
pub fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name().to_string()))
            .is_some_and(|name| matches!(name.as_str(), "script" | "style" | "noscript" | "template"));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

fn collect_links(root: ElementRef<'_>, base: &Url) -> Vec<Link> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    root.select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = resolve_link(base, href)?;
            let mut text = element_text(element);
            if text.is_empty() {
                text = element.value().attr("title").unwrap_or_default().trim().to_string();
            }
            Some(Link { url, text })
        })
        .collect()
}

fn collect_headings(document: &Html, base: &Url) -> Vec<Heading> {
    let Some(h_selector) = selector("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    document
        .select(&h_selector)
        .map(|element| {
            let level = element.value().name()[1..].parse().unwrap_or(6);
            let section = element.parent().and_then(ElementRef::wrap);
            Heading {
                level,
                text: element_text(element),
                section_text: section.map(visible_text).unwrap_or_default(),
                section_links: section
                    .map(|s| collect_links(s, base))
                    .unwrap_or_default(),
            }
        })
        .collect()
}
