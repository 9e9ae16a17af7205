//! One-shot startup sequence: health probe, settings, greeting.
//!
//! None of the steps is fatal. Whatever fails, the report always carries a
//! greeting, and it carries suggestions unless the backend explicitly said
//! it has no data loaded.

use datachat_core::backend::{QueryBackend, Settings};
use datachat_core::suggestion::{DEFAULT_GREETING, default_suggestions};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    /// Whether the health probe answered within its deadline.
    pub healthy: bool,
    pub settings: Option<Settings>,
    pub greeting: String,
    /// Initial chip pool. Empty when the backend reported `has_data: false`.
    pub suggestions: Vec<String>,
    pub has_data: bool,
    pub show_faqs: bool,
    /// The greeting call failed and built-in content is used instead.
    pub used_fallback: bool,
}

impl BootstrapReport {
    fn fallback(healthy: bool, settings: Option<Settings>) -> Self {
        Self {
            healthy,
            settings,
            greeting: DEFAULT_GREETING.to_string(),
            suggestions: default_suggestions(),
            has_data: true,
            show_faqs: true,
            used_fallback: true,
        }
    }
}

pub struct Bootstrapper {
    backend: Arc<dyn QueryBackend>,
    health_timeout: Duration,
}

impl Bootstrapper {
    pub fn new(backend: Arc<dyn QueryBackend>, health_timeout: Duration) -> Self {
        Self {
            backend,
            health_timeout,
        }
    }

    pub async fn run(&self) -> BootstrapReport {
        let healthy = self.probe_health().await;
        let settings = self.load_settings().await;

        tracing::info!("[Bootstrap] Fetching greeting...");
        let greet = match self.backend.greet().await {
            Ok(greet) => greet,
            Err(e) => {
                tracing::warn!("[Bootstrap] Greeting failed, using built-in content: {}", e);
                return BootstrapReport::fallback(healthy, settings);
            }
        };

        let greeting = if greet.message.trim().is_empty() {
            DEFAULT_GREETING.to_string()
        } else {
            greet.message
        };

        let suggestions = if !greet.has_data {
            tracing::info!("[Bootstrap] Backend has no data loaded, suggestions hidden");
            Vec::new()
        } else if greet.suggestions.is_empty() {
            default_suggestions()
        } else {
            greet.suggestions
        };

        tracing::info!(
            "[Bootstrap] Ready (healthy: {}, has_data: {}, {} suggestion(s))",
            healthy,
            greet.has_data,
            suggestions.len()
        );

        BootstrapReport {
            healthy,
            settings,
            greeting,
            suggestions,
            has_data: greet.has_data,
            show_faqs: greet.show_faqs.unwrap_or(true),
            used_fallback: false,
        }
    }

    async fn probe_health(&self) -> bool {
        tracing::info!("[Bootstrap] Probing backend health...");
        match tokio::time::timeout(self.health_timeout, self.backend.health()).await {
            Ok(Ok(status)) => {
                tracing::info!(
                    "[Bootstrap] Backend healthy (status: {}, files: {:?})",
                    status.status,
                    status.loaded_files_count
                );
                true
            }
            Ok(Err(e)) => {
                tracing::warn!("[Bootstrap] Health check failed: {}", e);
                false
            }
            Err(_) => {
                tracing::warn!(
                    "[Bootstrap] Health check timed out after {:?}",
                    self.health_timeout
                );
                false
            }
        }
    }

    async fn load_settings(&self) -> Option<Settings> {
        match self.backend.settings().await {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("[Bootstrap] Failed to load settings: {}", e);
                None
            }
        }
    }
}
