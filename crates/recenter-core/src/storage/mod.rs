mod config;
mod database;

pub use config::{Config, ReportsConfig, SessionConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Returns `~/.config/recenter[-dev]/` based on RECENTER_ENV.
///
/// Set RECENTER_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RECENTER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("recenter-dev")
    } else {
        base_dir.join("recenter")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
