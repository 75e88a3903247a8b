//! Persistent configuration for simcheck.
//!
//! Stores user settings in `~/.simcheck/config.json`. The only settings are
//! the command used to list simulators, for machines where `xcrun` is not the
//! right entry point (or for tests that feed a recorded listing through
//! `cat`).
//!
//! # Example
//!
//! ```no_run
//! use simcheck_core::config::SimcheckConfig;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = SimcheckConfig::load();
//!
//! if let Some(program) = &config.listing_program {
//!     println!("Listing with: {program}");
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const CONFIG_DIRNAME: &str = ".simcheck";
const CONFIG_FILENAME: &str = "config.json";

/// Errors from reading or writing an explicitly named config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Persistent simcheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SimcheckConfig {
    /// Program to run instead of `xcrun`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_program: Option<String>,

    /// Arguments for `listing_program`. Ignored when no program is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_args: Option<Vec<String>>,
}

/// Returns `~/.simcheck`, or `None` if there is no home directory.
pub fn simcheck_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIRNAME))
}

/// Returns the default config file path, `~/.simcheck/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    simcheck_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

impl SimcheckConfig {
    /// Load config from `~/.simcheck/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        default_config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config");
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save config to `~/.simcheck/config.json`, creating the directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        let dir = simcheck_dir().ok_or(ConfigError::NoHomeDir)?;
        std::fs::create_dir_all(&dir)?;
        self.save_to(&dir.join(CONFIG_FILENAME))
    }

    /// Save config as pretty-printed JSON to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
