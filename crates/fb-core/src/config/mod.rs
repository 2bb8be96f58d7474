//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No business logic or policies
//! - No validation logic
//! - No default value calculation
//!
//! > **This module contains data only, no policy, no validation.**
//! > Zero and empty values are facts; the app layer decides what they mean.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the storage slot and logs (path info only)
    pub data_dir: PathBuf,

    /// Namespaced key of the local storage slot
    pub slot_key: String,

    /// Remote onboarding service settings
    pub remote: RemoteConfig,

    /// Sport ids that carry team-level data
    pub team_sports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Missing values become empty/zero facts.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let int_at = |section: &str, key: &str| {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
        };

        Ok(Self {
            data_dir: PathBuf::from(str_at("storage", "data_dir")),
            slot_key: str_at("storage", "slot_key"),
            remote: RemoteConfig {
                base_url: str_at("remote", "base_url"),
                request_timeout_ms: int_at("remote", "request_timeout_ms").max(0) as u64,
                max_attempts: int_at("remote", "max_attempts").max(0) as u32,
                base_backoff_ms: int_at("remote", "base_backoff_ms").max(0) as u64,
                max_backoff_ms: int_at("remote", "max_backoff_ms").max(0) as u64,
            },
            team_sports: toml_value
                .get("catalog")
                .and_then(|c| c.get("team_sports"))
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Create empty AppConfig (all empty/zero values)
    pub fn empty() -> Self {
        Self {
            data_dir: PathBuf::new(),
            slot_key: String::new(),
            remote: RemoteConfig {
                base_url: String::new(),
                request_timeout_ms: 0,
                max_attempts: 0,
                base_backoff_ms: 0,
                max_backoff_ms: 0,
            },
            team_sports: Vec::new(),
        }
    }

    /// Create AppConfig rooted at a system data directory.
    ///
    /// The base directory is computed by the caller (e.g. with the `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Self::empty()
        }
    }
}
