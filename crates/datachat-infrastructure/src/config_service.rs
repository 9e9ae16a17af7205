//! Configuration service implementation.
//!
//! Loads the widget configuration from `config.toml` and applies the
//! `DATACHAT_API_BASE` override. A missing file is not an error: the
//! defaults are used instead.

use crate::paths::DatachatPaths;
use datachat_core::{DatachatError, Result, WidgetConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "DATACHAT_API_BASE";

/// Configuration service that loads and caches the widget configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    base_url_override: Option<String>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<WidgetConfig>>>,
}

impl ConfigService {
    /// Uses the platform config file and the process environment.
    pub fn new() -> Self {
        Self {
            path: DatachatPaths::config_file().ok(),
            base_url_override: std::env::var(BASE_URL_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads from an explicit file instead of the platform default.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self.invalidate_cache();
        self
    }

    /// Replaces the `base_url` override (normally taken from the environment).
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        self.base_url_override = base_url;
        self.invalidate_cache();
        self
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<WidgetConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| DatachatError::internal("config cache poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load()?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|_| DatachatError::internal("config cache poisoned"))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load(&self) -> Result<WidgetConfig> {
        let mut config = match &self.path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                let config = WidgetConfig::from_toml_str(&content).map_err(|e| {
                    DatachatError::config(format!("{}: {}", path.display(), e))
                })?;
                tracing::info!("[Config] Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                tracing::debug!(
                    "[Config] No configuration at {}, using defaults",
                    path.display()
                );
                WidgetConfig::default()
            }
            None => WidgetConfig::default(),
        };

        if let Some(base_url) = &self.base_url_override {
            tracing::info!("[Config] {} overrides base_url: {}", BASE_URL_ENV, base_url);
            config.base_url = base_url.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
