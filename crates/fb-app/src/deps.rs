//! # Onboarding Dependencies
//!
//! Dependency grouping for [`OnboardingController`](crate::OnboardingController)
//! construction.
//!
//! **Note**: This is NOT a Builder pattern.
//! - No build steps
//! - No hidden logic
//! - Just parameter grouping

use std::sync::Arc;

use fb_core::ports::{
    AuthSessionPort, ClockPort, RemoteOnboardingPort, SportsCatalogPort, StorageSlotPort,
};

use crate::sync::SyncPolicy;

/// Onboarding dependency grouping (non-Builder, just parameter grouping)
///
/// All dependencies are required; the policy is computed by the caller
/// (usually with [`SyncPolicy::from_config`]).
pub struct OnboardingDeps {
    // Local durability
    pub slot: Arc<dyn StorageSlotPort>,

    // Remote sync
    pub remote: Arc<dyn RemoteOnboardingPort>,
    pub auth: Arc<dyn AuthSessionPort>,
    pub sync_policy: SyncPolicy,

    // Domain collaborators
    pub catalog: Arc<dyn SportsCatalogPort>,
    pub clock: Arc<dyn ClockPort>,
}
