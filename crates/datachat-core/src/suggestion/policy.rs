//! Chip selection policy and the used-suggestions memory.

use std::collections::HashSet;

/// Maximum number of suggestion chips rendered at once.
pub const MAX_CHIPS: usize = 3;

/// Suggestions the visitor already picked in this session.
///
/// Append-only and never cleared. Used to re-rank candidates, never to
/// exclude them.
#[derive(Debug, Clone, Default)]
pub struct UsedSuggestions {
    entries: HashSet<String>,
}

impl UsedSuggestions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection. Returns `false` if it was already recorded.
    pub fn record(&mut self, suggestion: &str) -> bool {
        if self.entries.contains(suggestion) {
            return false;
        }
        self.entries.insert(suggestion.to_string())
    }

    pub fn contains(&self, suggestion: &str) -> bool {
        self.entries.contains(suggestion)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reduces a candidate list to at most [`MAX_CHIPS`] entries.
///
/// Candidates are deduplicated (first occurrence wins), unused entries are
/// taken first in their original order, and used entries fill the remaining
/// slots. An empty result means the chip surface stays hidden.
pub fn select_for_display<S: AsRef<str>>(candidates: &[S], used: &UsedSuggestions) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unused: Vec<&str> = Vec::new();
    let mut already_used: Vec<&str> = Vec::new();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate.trim().is_empty() || !seen.insert(candidate) {
            continue;
        }
        if used.contains(candidate) {
            already_used.push(candidate);
        } else {
            unused.push(candidate);
        }
    }

    unused
        .into_iter()
        .chain(already_used)
        .take(MAX_CHIPS)
        .map(str::to_string)
        .collect()
}
