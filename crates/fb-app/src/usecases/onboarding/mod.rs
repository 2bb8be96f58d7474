mod controller;
mod get_state;
mod outcome;
mod reset;

pub use controller::OnboardingController;
pub use get_state::{GetOnboardingState, OnboardingSnapshot};
pub use outcome::{IntentError, IntentOutcome, Transition};
pub use reset::ResetOnboarding;
