//! Suggestion content and ranking.
//!
//! # Module Structure
//!
//! - `policy`: chip selection (`select_for_display`) and `UsedSuggestions`
//! - `keywords`: static keyword → question table for local autocomplete
//! - `catalog`: default greeting, default chips and the built-in FAQ catalog

pub mod catalog;
pub mod keywords;
mod policy;

pub use catalog::{DEFAULT_GREETING, builtin_faq_catalog, default_suggestions};
pub use policy::{MAX_CHIPS, UsedSuggestions, select_for_display};
