use fb_core::onboarding::{
    BlockReason, OnboardingState, OnboardingStep, SelectionError, StepValidation,
};
use serde::Serialize;

use crate::persistence::PersistenceDegraded;

/// Errors returned synchronously by `apply_intent`. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("onboarding is already completed")]
    AlreadyCompleted,
}

/// What happened to the step cursor while applying an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// The cursor did not move.
    Unchanged,
    Moved {
        from: OnboardingStep,
        to: OnboardingStep,
    },
    /// A direct jump landed on an earlier unmet step instead.
    Redirected {
        requested: OnboardingStep,
        landed: OnboardingStep,
    },
    /// Forward navigation refused by the validator.
    Blocked { reason: BlockReason },
    Completed,
    /// A navigation intent arrived while another was in flight.
    Dropped,
}

/// Result of one intent, ready to be rendered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentOutcome {
    pub state: OnboardingState,
    /// Validation of the (possibly new) current step.
    pub validation: StepValidation,
    pub transition: Transition,
    /// Set when the local write did not happen.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_notice")]
    pub persistence: Option<PersistenceDegraded>,
}

impl IntentOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self.transition, Transition::Dropped)
    }
}

fn serialize_notice<S: serde::Serializer>(
    notice: &Option<PersistenceDegraded>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match notice {
        Some(notice) => serializer.serialize_str(&notice.to_string()),
        None => serializer.serialize_none(),
    }
}
