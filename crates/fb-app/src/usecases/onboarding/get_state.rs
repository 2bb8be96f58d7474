use std::sync::Arc;

use fb_core::onboarding::{OnboardingState, StepValidation, StepValidator};
use fb_core::ports::{SportsCatalogPort, StorageSlotPort};
use serde::Serialize;

use crate::persistence::LocalPersistence;

/// Read-only view of the persisted onboarding progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSnapshot {
    pub state: OnboardingState,
    pub validation: StepValidation,
    /// False when the slot was empty or its payload was discarded.
    pub has_prior_session: bool,
}

/// Use case for peeking at persisted onboarding state.
///
/// Returns the stored state (or a fresh one) together with the validation
/// of its current step, without constructing a controller.
pub struct GetOnboardingState {
    slot: Arc<dyn StorageSlotPort>,
    catalog: Arc<dyn SportsCatalogPort>,
}

impl GetOnboardingState {
    pub fn new(slot: Arc<dyn StorageSlotPort>, catalog: Arc<dyn SportsCatalogPort>) -> Self {
        Self { slot, catalog }
    }

    /// Create a new GetOnboardingState use case from cloned Arc<dyn Port> references.
    pub fn from_ports(slot: Arc<dyn StorageSlotPort>, catalog: Arc<dyn SportsCatalogPort>) -> Self {
        Self::new(slot, catalog)
    }

    pub async fn execute(&self) -> OnboardingSnapshot {
        let loaded = LocalPersistence::new(Arc::clone(&self.slot)).load().await;
        let has_prior_session = loaded.is_some();
        let mut state = loaded.unwrap_or_default();
        let validator = StepValidator::new(self.catalog.as_ref());
        state.current_step = validator.resume_step(&state);
        let validation = validator.can_advance(state.current_step, &state);

        OnboardingSnapshot {
            state,
            validation,
            has_prior_session,
        }
    }
}
