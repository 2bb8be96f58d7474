use std::fmt;

use serde::{Deserialize, Serialize};

/// Onboarding flow step.
///
/// Persisted and sent over the wire as its 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OnboardingStep {
    /// Welcome screen.
    Welcome = 1,
    /// Sports selection and ranking.
    Sports = 2,
    /// Team selection with affinity scores.
    Teams = 3,
    /// Content preferences.
    Preferences = 4,
    /// Completion summary (terminal).
    Completion = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("onboarding step must be within 1..=5, got {0}")]
pub struct InvalidStep(pub u8);

impl OnboardingStep {
    pub const FIRST: Self = Self::Welcome;
    pub const LAST: Self = Self::Completion;

    pub const ALL: [Self; 5] = [
        Self::Welcome,
        Self::Sports,
        Self::Teams,
        Self::Preferences,
        Self::Completion,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number().checked_sub(1)?)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::LAST
    }

    /// Steps that must be satisfied before `self` may be entered, in order.
    pub fn prerequisites(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().take_while(move |step| *step < self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Sports => "sports",
            Self::Teams => "teams",
            Self::Preferences => "preferences",
            Self::Completion => "completion",
        }
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for OnboardingStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(InvalidStep(value))
    }
}

impl From<OnboardingStep> for u8 {
    fn from(step: OnboardingStep) -> Self {
        step.number()
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.name())
    }
}
