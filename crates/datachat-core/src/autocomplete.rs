//! Autocomplete dropdown contents.

use serde::Serialize;

/// Maximum number of completions rendered in the dropdown.
pub const MAX_AUTOCOMPLETE_ITEMS: usize = 5;

/// Lower-cases and trims raw input the way every lookup expects it.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// What the dropdown currently shows.
///
/// `highlight` is `None` until the visitor moves through the list; keyboard
/// navigation wraps around `items.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteQuery {
    pub raw_input: String,
    pub normalized_input: String,
    pub items: Vec<String>,
    pub highlight: Option<usize>,
}

impl AutocompleteQuery {
    pub fn new(raw_input: impl Into<String>, mut items: Vec<String>) -> Self {
        let raw_input = raw_input.into();
        items.truncate(MAX_AUTOCOMPLETE_ITEMS);
        Self {
            normalized_input: normalize(&raw_input),
            raw_input,
            items,
            highlight: None,
        }
    }

    pub fn highlight_next(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.highlight = Some(match self.highlight {
            Some(idx) => (idx + 1) % len,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.highlight = Some(match self.highlight {
            Some(idx) => (idx + len - 1) % len,
            None => len - 1,
        });
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlight
            .and_then(|idx| self.items.get(idx))
            .map(String::as_str)
    }

    /// Each item split into plain and matching segments.
    pub fn rendered(&self) -> Vec<Vec<Segment>> {
        self.items
            .iter()
            .map(|item| highlight_matches(item, &self.normalized_input))
            .collect()
    }
}

/// A piece of a rendered completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Plain(String),
    Match(String),
}

/// Marks case-insensitive occurrences of `query` in `item`.
///
/// The full query is tried first; if it does not occur, every query word of
/// two or more characters is marked instead.
pub fn highlight_matches(item: &str, query: &str) -> Vec<Segment> {
    let query = normalize(query);
    if query.is_empty() {
        return vec![Segment::Plain(item.to_string())];
    }

    let lower = item.to_lowercase();
    // Lower-casing can change byte lengths outside ASCII; only mark when the
    // offsets line up.
    if lower.len() != item.len() {
        return vec![Segment::Plain(item.to_string())];
    }

    let mut ranges = find_all(&lower, &query);
    if ranges.is_empty() {
        for word in query.split_whitespace().filter(|w| w.chars().count() >= 2) {
            ranges.extend(find_all(&lower, word));
        }
        ranges.sort_unstable();
        ranges = merge(ranges);
    }
    if ranges
        .iter()
        .any(|&(start, end)| !item.is_char_boundary(start) || !item.is_char_boundary(end))
    {
        return vec![Segment::Plain(item.to_string())];
    }

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor {
            segments.push(Segment::Plain(item[cursor..start].to_string()));
        }
        segments.push(Segment::Match(item[start..end].to_string()));
        cursor = end;
    }
    if cursor < item.len() {
        segments.push(Segment::Plain(item[cursor..].to_string()));
    }
    segments
}

fn find_all(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    haystack
        .match_indices(needle)
        .map(|(start, m)| (start, start + m.len()))
        .collect()
}

fn merge(ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
