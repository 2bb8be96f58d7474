//! # fb-core
//!
//! Core domain models and business logic for the Fanboard onboarding flow.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod ids;
pub mod onboarding;
pub mod ports;
pub mod sync;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::{SportId, TeamId};
pub use onboarding::{
    AffinityScore, BlockReason, ContentFrequency, OnboardingIntent, OnboardingState,
    OnboardingStep, Preferences, PreferencesPatch, RankedSport, SelectionError, SelectionStore,
    StepPayload, StepValidation, StepValidator, TeamSelection,
};
pub use sync::SyncStatus;
