//! # Dependency Injection
//!
//! ## Responsibilities
//!
//! - Create infra implementations (file slot, HTTP client, auth session, catalog)
//! - Group them into [`OnboardingDeps`] for the controller
//!
//! ## Prohibited
//!
//! - No business logic
//! - No configuration validation
//!
//! > **This is the only place allowed to depend on fb-infra and fb-app simultaneously.**
//! > The privilege is for assembly, not decision making.

use std::sync::Arc;

use fb_app::{OnboardingDeps, SyncPolicy};
use fb_core::config::AppConfig;
use fb_core::ports::{AuthSessionPort, SportsCatalogPort, StorageSlotPort};
use fb_infra::{
    FileStorageSlot, HttpRemoteOnboardingClient, StaticAuthSession, StaticSportsCatalog,
    SystemClock, DEFAULT_SLOT_KEY,
};
use tracing::info;

pub fn build_storage_slot(config: &AppConfig) -> Arc<dyn StorageSlotPort> {
    let key = if config.slot_key.is_empty() {
        DEFAULT_SLOT_KEY
    } else {
        config.slot_key.as_str()
    };
    Arc::new(FileStorageSlot::new(&config.data_dir, key))
}

pub fn build_catalog(config: &AppConfig) -> Arc<dyn SportsCatalogPort> {
    Arc::new(StaticSportsCatalog::from_config(config))
}

/// Wires every onboarding port from config.
///
/// Without a remote base URL the session is treated as signed out, so no
/// remote call is ever made.
pub fn wire_onboarding(
    config: &AppConfig,
    id_token: Option<String>,
) -> anyhow::Result<OnboardingDeps> {
    let sync_policy = SyncPolicy::from_config(&config.remote);
    let remote = HttpRemoteOnboardingClient::new(
        config.remote.base_url.clone(),
        sync_policy.request_timeout,
    )?;

    let auth: Arc<dyn AuthSessionPort> = if config.remote.base_url.is_empty() {
        info!("remote onboarding service not configured, sync disabled");
        Arc::new(StaticAuthSession::signed_out())
    } else {
        Arc::new(StaticAuthSession::new(id_token))
    };

    Ok(OnboardingDeps {
        slot: build_storage_slot(config),
        remote: Arc::new(remote),
        auth,
        sync_policy,
        catalog: build_catalog(config),
        clock: Arc::new(SystemClock),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_key_falls_back_to_default() {
        let config = AppConfig::with_system_defaults("/tmp/fanboard".into());
        assert_eq!(build_storage_slot(&config).key(), DEFAULT_SLOT_KEY);
    }

    #[test]
    fn test_missing_base_url_disables_sync() {
        let config = AppConfig::with_system_defaults("/tmp/fanboard".into());
        let deps = wire_onboarding(&config, Some("token".to_string())).unwrap();
        assert!(!deps.auth.is_authenticated());
    }

    #[test]
    fn test_configured_remote_uses_token() {
        let mut config = AppConfig::with_system_defaults("/tmp/fanboard".into());
        config.remote.base_url = "http://localhost:9000".to_string();

        let deps = wire_onboarding(&config, Some("token".to_string())).unwrap();

        assert!(deps.auth.is_authenticated());
        assert_eq!(deps.sync_policy, SyncPolicy::default());
    }
}
