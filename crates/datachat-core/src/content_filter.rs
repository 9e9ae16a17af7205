//! Personal-data screening for assistant answers.
//!
//! An answer that mentions any personal-data field label is never shown,
//! not even partially: the whole text is replaced with [`REFUSAL_TEXT`].

use once_cell::sync::Lazy;
use regex::RegexSet;

pub const REFUSAL_TEXT: &str = "I can't share personal or individual-level information such as names, contact details, employers, compensation, notice periods or experience.\n\nI can help with aggregate questions about your data, for example:\n• Counts and totals (number of records, total cost)\n• Averages, minimums and maximums\n• Distributions by category, location or transportation mode\n• Dataset structure: column names, data types and missing values";

/// Field labels associated with personal data, grouped by category.
static PERSONAL_FIELD_PATTERNS: &[(&str, &str)] = &[
    ("name", r"(?i)\b(full|first|last|employee|candidate)[\s_-]*name\b"),
    ("name", r"(?im)^\s*name\s*[:=|]"),
    ("phone", r"(?i)\b(phone|mobile|cell|contact)[\s_-]*(no|number|num)\b"),
    ("phone", r"(?i)\b(phone|mobile)\s*[:=|]"),
    ("email", r"(?i)\be[\s_-]?mail([\s_-]*(address|id))?\b"),
    ("employer", r"(?i)\b(current|previous|present)[\s_-]*(employer|company|organi[sz]ation)\b"),
    ("employer", r"(?i)\bemployer\b"),
    ("compensation", r"(?i)\b(current|expected)?[\s_-]*ctc\b"),
    ("compensation", r"(?i)\b(salary|compensation|annual[\s_-]*package)\b"),
    ("notice_period", r"(?i)\bnotice[\s_-]*period\b"),
    ("experience", r"(?i)\b(total|relevant|years[\s_-]*of|work)[\s_-]*experience\b"),
];

static PERSONAL_FIELDS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(PERSONAL_FIELD_PATTERNS.iter().map(|(_, pattern)| *pattern)).unwrap_or_else(
        |e| {
            tracing::error!(error = %e, "personal-data patterns failed to compile, screening disabled");
            RegexSet::empty()
        },
    )
});

/// Outcome of screening an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screened {
    /// Safe to display as-is.
    Allowed(String),
    /// Replaced with the refusal; `categories` lists what matched.
    Refused { categories: Vec<&'static str> },
}

impl Screened {
    /// The text that should actually be rendered.
    pub fn display_text(&self) -> &str {
        match self {
            Screened::Allowed(text) => text,
            Screened::Refused { .. } => REFUSAL_TEXT,
        }
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, Screened::Refused { .. })
    }
}

/// Returns the personal-data categories whose labels appear in `text`.
pub fn personal_data_categories(text: &str) -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = PERSONAL_FIELDS
        .matches(text)
        .into_iter()
        .map(|idx| PERSONAL_FIELD_PATTERNS[idx].0)
        .collect();
    categories.dedup();
    categories
}

pub fn screen_answer(text: &str) -> Screened {
    let categories = personal_data_categories(text);
    if categories.is_empty() {
        Screened::Allowed(text.to_string())
    } else {
        Screened::Refused { categories }
    }
}
