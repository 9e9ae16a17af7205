//! Widget configuration.
//!
//! The values here are injected by the host; the engine never decides the
//! backend URL on its own. Every field has a default so a partial TOML file
//! (or none at all) yields a usable configuration.

use crate::error::{DatachatError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// What to do with an autocomplete resolution that finishes after a newer
/// one was issued (or after the input was cleared).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaleAutocompletePolicy {
    /// Drop stale resolutions using the monotonic request id.
    #[default]
    Discard,
    /// Last write wins: any resolution that completes is rendered.
    Render,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    pub base_url: String,
    pub autocomplete_debounce_ms: u64,
    pub suggestions_reveal_ms: u64,
    pub suggestions_resume_ms: u64,
    pub query_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub stale_autocomplete: StaleAutocompletePolicy,
    pub log_dir: Option<PathBuf>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            autocomplete_debounce_ms: 150,
            suggestions_reveal_ms: 200,
            suggestions_resume_ms: 500,
            query_timeout_secs: 60,
            health_timeout_secs: 5,
            request_timeout_secs: 30,
            stale_autocomplete: StaleAutocompletePolicy::default(),
            log_dir: None,
        }
    }
}

impl WidgetConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_stale_autocomplete(mut self, policy: StaleAutocompletePolicy) -> Self {
        self.stale_autocomplete = policy;
        self
    }

    /// Parses a TOML document, filling missing keys with defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WidgetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(DatachatError::config("base_url must not be empty"));
        }
        if self.query_timeout_secs == 0 || self.health_timeout_secs == 0 {
            return Err(DatachatError::config("timeouts must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(DatachatError::config(
                "request_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn timings(&self) -> SurfaceTimings {
        SurfaceTimings {
            autocomplete_debounce: Duration::from_millis(self.autocomplete_debounce_ms),
            suggestions_reveal: Duration::from_millis(self.suggestions_reveal_ms),
            suggestions_resume: Duration::from_millis(self.suggestions_resume_ms),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Debounce delays used by the help-surface coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTimings {
    pub autocomplete_debounce: Duration,
    pub suggestions_reveal: Duration,
    pub suggestions_resume: Duration,
}

impl Default for SurfaceTimings {
    fn default() -> Self {
        WidgetConfig::default().timings()
    }
}
