//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Display name used when a fresh store is created
//! - Default target days for new pledges
//!
//! Configuration is stored at `~/.config/rekindle/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

fn default_user_name() -> String {
    "me".to_string()
}

fn default_target_days() -> u32 {
    7
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rekindle/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name on the user record when a fresh store is created.
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// Target days for new pledges when none is given.
    #[serde(default = "default_target_days")]
    pub default_target_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user_name: default_user_name(),
            default_target_days: default_target_days(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        let dir = data_dir().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path (for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(config)
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save to an explicit path (for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
