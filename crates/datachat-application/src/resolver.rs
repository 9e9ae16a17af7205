//! Remote suggestion resolver.
//!
//! Turns a typed query into at most [`MAX_AUTOCOMPLETE_ITEMS`] completions.
//! The sources are tried in order and the first non-empty result wins:
//!
//! 1. the local keyword table,
//! 2. the backend `autocomplete` call with the whole query,
//! 3. the backend `autocomplete` call with only the last word, attempted
//!    only when step 2 was rejected by the server.
//!
//! Failures never surface to the visitor. They resolve to an empty list
//! (the dropdown hides) and are logged.

use datachat_core::autocomplete::{MAX_AUTOCOMPLETE_ITEMS, normalize};
use datachat_core::backend::QueryBackend;
use datachat_core::suggestion::keywords;
use std::sync::Arc;

const MIN_FALLBACK_WORD_LEN: usize = 2;

pub struct SuggestionResolver {
    backend: Arc<dyn QueryBackend>,
}

impl SuggestionResolver {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }

    /// Resolves `raw_input` to completions. An empty result means "hide".
    pub async fn resolve(&self, raw_input: &str) -> Vec<String> {
        let query = normalize(raw_input);
        if query.is_empty() {
            return Vec::new();
        }

        let local = keywords::lookup(&query);
        if !local.is_empty() {
            tracing::debug!(query = %query, hits = local.len(), "autocomplete resolved locally");
            return cap(local);
        }

        let err = match self.backend.autocomplete(&query).await {
            Ok(response) => return filter_relevant(&query, response.suggestions),
            Err(err) => err,
        };

        if !err.is_server() {
            tracing::warn!(query = %query, error = %err, "autocomplete lookup failed");
            return Vec::new();
        }

        let Some(last_word) = fallback_word(&query) else {
            tracing::warn!(query = %query, error = %err, "autocomplete lookup rejected, no fallback word");
            return Vec::new();
        };

        tracing::debug!(query = %query, last_word, error = %err, "retrying autocomplete with last word");
        match self.backend.autocomplete(last_word).await {
            Ok(response) => filter_relevant(&query, response.suggestions),
            Err(err) => {
                tracing::warn!(query = %query, last_word, error = %err, "autocomplete fallback failed");
                Vec::new()
            }
        }
    }
}

/// The last word of `query`, if it is a usable fallback lookup on its own.
fn fallback_word(query: &str) -> Option<&str> {
    let last = query.split_whitespace().last()?;
    (last != query && last.chars().count() >= MIN_FALLBACK_WORD_LEN).then_some(last)
}

fn cap(mut items: Vec<String>) -> Vec<String> {
    items.truncate(MAX_AUTOCOMPLETE_ITEMS);
    items
}

/// Keeps server suggestions related to `query`: those containing the whole
/// query or any of its words. Falls back to the unfiltered list when nothing
/// matches.
fn filter_relevant(query: &str, suggestions: Vec<String>) -> Vec<String> {
    let suggestions: Vec<String> = suggestions
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let words: Vec<&str> = query.split_whitespace().collect();

    let relevant: Vec<String> = suggestions
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            lower.contains(query) || words.iter().any(|w| lower.contains(w))
        })
        .cloned()
        .collect();

    if relevant.is_empty() {
        cap(suggestions)
    } else {
        cap(relevant)
    }
}
