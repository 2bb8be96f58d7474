//! Business logic use cases
//!
//! The onboarding controller is the only entry point presentation code uses
//! for mutations; the stand-alone use cases below operate on the storage slot
//! directly for one-shot callers such as the CLI.

pub mod onboarding;

pub use onboarding::{
    GetOnboardingState, IntentError, IntentOutcome, OnboardingController, OnboardingSnapshot,
    ResetOnboarding, Transition,
};
