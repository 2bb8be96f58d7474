//! Onboarding domain models
//!
//! This module defines the core domain for the multi-step onboarding flow:
//! the selection state, the rank normalizer, step gating predicates, the
//! per-step remote payloads and the versioned local serialization.

pub mod envelope;
pub mod intent;
pub mod payload;
pub mod rank;
pub mod selection;
pub mod state;
pub mod step;
pub mod validator;

pub use envelope::{decode_state, encode_state, DecodeError, STATE_SCHEMA_VERSION};
pub use intent::OnboardingIntent;
pub use payload::StepPayload;
pub use rank::{normalize_ranks, RankCandidate, ReorderRequest};
pub use selection::{SelectionError, SelectionStore};
pub use state::{
    AffinityScore, ContentFrequency, NewsTypePatch, NewsTypePreference, OnboardingState,
    Preferences, PreferencesPatch, RankedSport, TeamSelection, MAX_SELECTED_SPORTS,
};
pub use step::{InvalidStep, OnboardingStep};
pub use validator::{BlockReason, StepValidation, StepValidator};
