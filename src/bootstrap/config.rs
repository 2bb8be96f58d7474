//! # Configuration Loader
//!
//! ## Responsibilities
//!
//! - Read TOML configuration files
//! - Parse TOML into the AppConfig DTO
//! - Report I/O and parsing errors with context
//!
//! ## Prohibited
//!
//! - No validation logic
//! - No business rules
//!
//! > **Pure data loading only. Accept whatever is in the file.**

use anyhow::Context;
use std::path::{Path, PathBuf};

use fb_core::config::AppConfig;
use fb_infra::app_data_dir;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
///
/// **NO validation is performed**: empty strings, zero timeouts and missing
/// sections are all accepted as facts.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Platform default config location: `<config_dir>/Fanboard/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Fanboard").join(CONFIG_FILE_NAME))
}

/// Picks the config source.
///
/// An explicit path must load. Otherwise the platform default file is used
/// when present, and system defaults when not. An empty `data_dir` is
/// filled with the platform data directory.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut config = match explicit {
        Some(path) => load_config(path.to_path_buf())?,
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => load_config(path)?,
            None => AppConfig::with_system_defaults(app_data_dir()?),
        },
    };

    if config.data_dir.as_os_str().is_empty() {
        config.data_dir = app_data_dir()?;
    }
    Ok(config)
}
