//! Fanboard Application Orchestration Layer
//!
//! This crate contains the onboarding use cases: local persistence over the
//! storage slot, remote sync coordination and the onboarding controller that
//! presentation code talks to.

pub mod deps;
pub mod persistence;
pub mod sync;
pub mod usecases;

pub use deps::OnboardingDeps;
pub use persistence::{LocalPersistence, PersistenceDegraded};
pub use sync::{SyncCoordinator, SyncPolicy};
pub use usecases::{
    GetOnboardingState, IntentError, IntentOutcome, OnboardingController, ResetOnboarding,
    Transition,
};
