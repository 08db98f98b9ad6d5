//! Ordered pattern rules for field extraction
//!
//! A field is filled by an ordered list of `(pattern, transform)` rules. Rules
//! are tried in order; within a rule every match is offered to the transform,
//! and the first transform that accepts a match fills the field. Later rules
//! are not consulted once a value is found.

use regex::{Captures, Regex};

/// Turns a match into a field value, or rejects it as implausible
pub type Transform = fn(&Captures<'_>) -> Option<String>;

/// One pattern and its transform
#[derive(Clone)]
pub struct Rule {
    pattern: Regex,
    transform: Transform,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("pattern", &self.pattern.as_str()).finish()
    }
}

impl Rule {
    /// Compiles a rule; invalid patterns are logged and yield `None`
    pub fn new(pattern: &str, transform: Transform) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(pattern) => Some(Self { pattern, transform }),
            Err(e) => {
                tracing::error!("Invalid extraction pattern {:?}: {}", pattern, e);
                None
            }
        }
    }

    /// First accepted value among this rule's matches
    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| (self.transform)(&caps))
    }
}

/// The ordered rule list for one field
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    /// Builds a rule list from `(pattern, transform)` pairs
    pub fn new(specs: &[(&str, Transform)]) -> Self {
        Self {
            rules: specs
                .iter()
                .filter_map(|(pattern, transform)| Rule::new(pattern, *transform))
                .collect(),
        }
    }

    /// Builds a rule list whose rules all keep capture group `group`
    pub fn group(patterns: &[&str], group: usize) -> Self {
        let transform: Transform = match group {
            0 => whole,
            1 => group1,
            2 => group2,
            _ => first_group,
        };
        let specs: Vec<(&str, Transform)> = patterns.iter().map(|p| (*p, transform)).collect();
        Self::new(&specs)
    }

    /// Value from the first rule that produces one
    pub fn first(&self, text: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.apply(text))
    }

    /// Whether any rule produces a value
    pub fn matches(&self, text: &str) -> bool {
        self.first(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Keeps the whole match
pub fn whole(caps: &Captures<'_>) -> Option<String> {
    non_empty(caps.get(0).map(|m| m.as_str()))
}

/// Keeps capture group 1
pub fn group1(caps: &Captures<'_>) -> Option<String> {
    non_empty(caps.get(1).map(|m| m.as_str()))
}

/// Keeps capture group 2
pub fn group2(caps: &Captures<'_>) -> Option<String> {
    non_empty(caps.get(2).map(|m| m.as_str()))
}

/// Keeps the first non-empty capture group
pub fn first_group(caps: &Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Keeps the first capture group made only of digits
pub fn first_digits(caps: &Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Keeps the first capture group that is a percentage between 0 and 100
pub fn percentage(caps: &Captures<'_>) -> Option<String> {
    first_digits(caps).filter(|d| d.parse::<u32>().is_ok_and(|n| n <= 100))
}

/// Keeps the first capture group that looks like a grouped or long number
pub fn large_number(caps: &Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| is_large_number(s))
        .map(str::to_string)
}

/// `12,345` or a bare number of at least four digits
pub fn is_large_number(s: &str) -> bool {
    let digits: String = s.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if s.contains(',') {
        let mut groups = s.split(',');
        let head_ok = groups.next().is_some_and(|g| (1..=3).contains(&g.len()));
        head_ok && groups.all(|g| g.len() == 3)
    } else {
        digits.len() >= 4
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().trim_end_matches(['.', ',', ';', ':']).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First table value whose keyword occurs in `text_lower`
pub fn lookup<'a>(text_lower: &str, table: &[(&str, &'a str)]) -> Option<&'a str> {
    table
        .iter()
        .find(|(keyword, _)| text_lower.contains(keyword))
        .map(|(_, value)| *value)
}

/// Every distinct table value whose keyword occurs in `text_lower`, in table order
pub fn lookup_all<'a>(text_lower: &str, table: &[(&str, &'a str)]) -> Vec<&'a str> {
    let mut found: Vec<&'a str> = Vec::new();
    for (keyword, value) in table {
        if text_lower.contains(keyword) && !found.contains(value) {
            found.push(value);
        }
    }
    found
}

/// Whether any keyword occurs in `text_lower`
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text_lower.contains(k))
}

/// Truncates to at most `max` characters on a char boundary
pub fn truncate(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", trimmed[..idx].trim_end()),
        None => trimmed.to_string(),
    }
}
