//! Per-step payloads sent to the remote onboarding service.
//!
//! Each payload carries only the delta of the step it belongs to plus the
//! step number, so the remote side can apply them idempotently in any order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OnboardingState, OnboardingStep, Preferences, RankedSport, TeamSelection};
use crate::ids::{SportId, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepPayload {
    Sports {
        step: OnboardingStep,
        sports: Vec<RankedSport>,
    },
    Teams {
        step: OnboardingStep,
        teams: Vec<TeamSelection>,
    },
    Preferences {
        step: OnboardingStep,
        preferences: Preferences,
    },
    #[serde(rename_all = "camelCase")]
    Completion {
        step: OnboardingStep,
        completed_at: DateTime<Utc>,
        sport_ids: Vec<SportId>,
        team_ids: Vec<TeamId>,
    },
}

impl StepPayload {
    /// Payload for the step the user just completed, if that step carries data.
    ///
    /// The welcome step has nothing to send. Completion requires `completed_at`.
    pub fn for_completed_step(step: OnboardingStep, state: &OnboardingState) -> Option<Self> {
        match step {
            OnboardingStep::Welcome => None,
            OnboardingStep::Sports => Some(Self::Sports {
                step,
                sports: state.selected_sports.clone(),
            }),
            OnboardingStep::Teams => Some(Self::Teams {
                step,
                teams: state.selected_teams.clone(),
            }),
            OnboardingStep::Preferences => {
                state
                    .preferences
                    .clone()
                    .map(|preferences| Self::Preferences { step, preferences })
            }
            OnboardingStep::Completion => state.completed_at.map(|completed_at| Self::Completion {
                step,
                completed_at,
                sport_ids: state.sport_ids().cloned().collect(),
                team_ids: state
                    .selected_teams
                    .iter()
                    .map(|team| team.team_id.clone())
                    .collect(),
            }),
        }
    }

    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::Sports { step, .. }
            | Self::Teams { step, .. }
            | Self::Preferences { step, .. }
            | Self::Completion { step, .. } => *step,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sports { .. } => "sports",
            Self::Teams { .. } => "teams",
            Self::Preferences { .. } => "preferences",
            Self::Completion { .. } => "completion",
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Completion { .. })
    }
}
