//! Versioned serialization of the onboarding state for the local storage slot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OnboardingState, SelectionStore, MAX_SELECTED_SPORTS};

/// Schema version written into every persisted envelope. Bump on any
/// incompatible change to [`OnboardingState`]'s serialized shape.
pub const STATE_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StateEnvelope {
    schema_version: u32,
    state: OnboardingState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateEnvelopeRef<'a> {
    schema_version: u32,
    state: &'a OnboardingState,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is empty")]
    Empty,
    #[error("payload is not a valid state envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload has no schema version")]
    MissingVersion,
    #[error("schema version {found} does not match expected {expected}")]
    VersionMismatch { found: u64, expected: u32 },
    #[error("payload selects {count} sports, more than the allowed {limit}")]
    TooManySports { count: usize, limit: usize },
}

pub fn encode_state(state: &OnboardingState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StateEnvelopeRef {
        schema_version: STATE_SCHEMA_VERSION,
        state,
    })
}

/// Decodes and heals a persisted envelope.
///
/// The version is checked before the state shape, so a payload from another
/// schema version is reported as [`DecodeError::VersionMismatch`] rather than
/// as malformed. No cross-version upgrade is attempted.
pub fn decode_state(raw: &str) -> Result<OnboardingState, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let value: Value = serde_json::from_str(raw)?;
    let found = value
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .ok_or(DecodeError::MissingVersion)?;
    if found != u64::from(STATE_SCHEMA_VERSION) {
        return Err(DecodeError::VersionMismatch {
            found,
            expected: STATE_SCHEMA_VERSION,
        });
    }

    let envelope: StateEnvelope = serde_json::from_value(value)?;
    // Counted after healing: repeated sport ids collapse into one selection.
    let state = SelectionStore::from_state(envelope.state).into_state();
    let count = state.selected_sports.len();
    if count > MAX_SELECTED_SPORTS {
        return Err(DecodeError::TooManySports {
            count,
            limit: MAX_SELECTED_SPORTS,
        });
    }

    Ok(state)
}
