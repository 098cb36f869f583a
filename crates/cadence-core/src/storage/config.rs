//! TOML-based application configuration.
//!
//! Stores deployment settings:
//! - Slack bot token used by the notifier
//! - Monthly activity goal override
//! - Optional database path override
//!
//! Configuration is stored at `~/.config/cadence/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::awards::MONTHLY_GOAL;

/// Slack configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token with `chat:write` scope.
    #[serde(default)]
    pub token: String,
}

/// Award configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardsConfig {
    #[serde(default = "default_monthly_goal")]
    pub monthly_goal: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cadence/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub awards: AwardsConfig,
    /// Overrides the default `~/.config/cadence/cadence.db` location.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_monthly_goal() -> i64 {
    MONTHLY_GOAL
}

impl Default for AwardsConfig {
    fn default() -> Self {
        Self {
            monthly_goal: default_monthly_goal(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
