//! Path management for datachat configuration and logs.
//!
//! ```text
//! ~/.config/datachat/          # Config directory
//! ├── config.toml              # Widget configuration
//! └── logs/                    # Default log directory
//!     └── datachat.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "datachat";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct DatachatPaths;

impl DatachatPaths {
    /// Returns the datachat configuration directory (e.g. `~/.config/datachat/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory for rolling log files.
    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_config_dir() {
        let Ok(dir) = DatachatPaths::config_dir() else {
            // No home directory in this environment.
            return;
        };
        assert!(dir.ends_with(APP_DIR));
        assert_eq!(DatachatPaths::config_file().unwrap(), dir.join("config.toml"));
        assert_eq!(DatachatPaths::log_dir().unwrap(), dir.join("logs"));
    }
}
