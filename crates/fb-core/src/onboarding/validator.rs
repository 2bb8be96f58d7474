//! Step validator.
//!
//! Pure gating predicates deciding whether the user may move forward from a
//! step. A blocked result is an expected outcome, not an error.

use std::fmt;

use serde::Serialize;

use super::{OnboardingState, OnboardingStep, MAX_SELECTED_SPORTS};
use crate::ports::SportsCatalogPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum BlockReason {
    NoSportsSelected,
    TooManySports { count: usize, limit: usize },
    NoTeamsSelected,
    PreferencesMissing,
    NoNewsTypeEnabled,
    TerminalStep,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSportsSelected => write!(f, "Select at least one sport to continue"),
            Self::TooManySports { count, limit } => {
                write!(f, "Select at most {limit} sports ({count} selected)")
            }
            Self::NoTeamsSelected => write!(f, "Pick at least one team to continue"),
            Self::PreferencesMissing => write!(f, "Choose your content preferences to continue"),
            Self::NoNewsTypeEnabled => write!(f, "Enable at least one news category"),
            Self::TerminalStep => write!(f, "Onboarding has no step after completion"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepValidation {
    Allowed,
    Blocked { reason: BlockReason },
}

impl StepValidation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn reason(&self) -> Option<BlockReason> {
        match self {
            Self::Allowed => None,
            Self::Blocked { reason } => Some(*reason),
        }
    }

    fn blocked(reason: BlockReason) -> Self {
        Self::Blocked { reason }
    }
}

/// Step gating predicates over a state and the sports catalog.
pub struct StepValidator<'a> {
    catalog: &'a dyn SportsCatalogPort,
}

impl<'a> StepValidator<'a> {
    pub fn new(catalog: &'a dyn SportsCatalogPort) -> Self {
        Self { catalog }
    }

    /// Whether forward navigation out of `step` is permitted.
    pub fn can_advance(&self, step: OnboardingStep, state: &OnboardingState) -> StepValidation {
        match step {
            OnboardingStep::Welcome => StepValidation::Allowed,
            OnboardingStep::Sports => {
                let count = state.selected_sports.len();
                if count == 0 {
                    StepValidation::blocked(BlockReason::NoSportsSelected)
                } else if count > MAX_SELECTED_SPORTS {
                    StepValidation::blocked(BlockReason::TooManySports {
                        count,
                        limit: MAX_SELECTED_SPORTS,
                    })
                } else {
                    StepValidation::Allowed
                }
            }
            OnboardingStep::Teams => {
                let any_team_sport = state
                    .sport_ids()
                    .any(|sport_id| self.catalog.supports_teams(sport_id));
                if !any_team_sport || !state.selected_teams.is_empty() {
                    StepValidation::Allowed
                } else {
                    StepValidation::blocked(BlockReason::NoTeamsSelected)
                }
            }
            OnboardingStep::Preferences => match &state.preferences {
                None => StepValidation::blocked(BlockReason::PreferencesMissing),
                Some(prefs) if !prefs.has_enabled_news_type() => {
                    StepValidation::blocked(BlockReason::NoNewsTypeEnabled)
                }
                Some(_) => StepValidation::Allowed,
            },
            OnboardingStep::Completion => StepValidation::blocked(BlockReason::TerminalStep),
        }
    }

    /// First step before `target` whose predicate fails, if any.
    pub fn first_unmet_prerequisite(
        &self,
        target: OnboardingStep,
        state: &OnboardingState,
    ) -> Option<(OnboardingStep, BlockReason)> {
        target
            .prerequisites()
            .find_map(|step| self.can_advance(step, state).reason().map(|r| (step, r)))
    }

    /// Where a direct navigation request to `target` actually lands.
    pub fn resolve_jump(&self, target: OnboardingStep, state: &OnboardingState) -> OnboardingStep {
        self.first_unmet_prerequisite(target, state)
            .map(|(step, _)| step)
            .unwrap_or(target)
    }

    /// Step a restored state resumes at. An incomplete state is rewound to
    /// its first unmet step; a completed one keeps its step.
    pub fn resume_step(&self, state: &OnboardingState) -> OnboardingStep {
        if state.is_completed() {
            state.current_step
        } else {
            self.resolve_jump(state.current_step, state)
        }
    }
}
