//! TOML-based application configuration.
//!
//! Stores the local user identity, the user's date frame, session
//! tracking cadence, and report defaults. Stored at
//! `~/.config/recenter/config.toml`.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::session::TrackerConfig;

use super::data_dir;

/// Session tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds between heartbeat duration writes.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: i64,
    /// Sessions shorter than this are persisted as abandoned.
    #[serde(default = "default_min_completed_secs")]
    pub min_completed_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
            min_completed_secs: default_min_completed_secs(),
        }
    }
}

impl SessionConfig {
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            heartbeat_secs: self.heartbeat_secs.max(1),
            min_completed_secs: self.min_completed_secs.max(0),
        }
    }
}

/// Report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Default trailing window for the distraction calendar.
    #[serde(default = "default_calendar_range_days")]
    pub calendar_range_days: u32,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            calendar_range_days: default_calendar_range_days(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Owning-user identifier stamped on every row.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Offset in hours from UTC for the user's local date frame.
    #[serde(default)]
    pub timezone_offset_hours: i32,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

impl Config {
    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, crate::error::CoreError> {
        let path = data_dir()?.join("config.toml");
        if !path.exists() {
            return Ok(Self::defaults());
        }
        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| {
            ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), crate::error::CoreError> {
        let path = data_dir()?.join("config.toml");
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    fn defaults() -> Self {
        Self {
            user_id: default_user_id(),
            timezone_offset_hours: 0,
            session: SessionConfig::default(),
            reports: ReportsConfig::default(),
        }
    }
}

fn default_user_id() -> String {
    "local".to_string()
}
fn default_heartbeat_secs() -> i64 {
    30
}
fn default_min_completed_secs() -> i64 {
    60
}
fn default_calendar_range_days() -> u32 {
    28
}
