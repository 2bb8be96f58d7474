use serde::{Deserialize, Serialize};

use super::{OnboardingStep, PreferencesPatch};
use crate::ids::{SportId, TeamId};

/// Intents raised by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OnboardingIntent {
    ToggleSport {
        sport_id: SportId,
    },
    ReorderSport {
        sport_id: SportId,
        to_index: usize,
    },
    ToggleTeam {
        team_id: TeamId,
        sport_id: SportId,
        #[serde(default)]
        default_affinity: Option<i64>,
    },
    SetAffinity {
        team_id: TeamId,
        score: i64,
    },
    SetPreferences {
        patch: PreferencesPatch,
    },
    Advance,
    Back,
    JumpToStep {
        step: OnboardingStep,
    },
    Complete,
}

impl OnboardingIntent {
    /// Navigation intents are debounced; selection intents are not.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::Advance | Self::Back | Self::JumpToStep { .. } | Self::Complete
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleSport { .. } => "toggle_sport",
            Self::ReorderSport { .. } => "reorder_sport",
            Self::ToggleTeam { .. } => "toggle_team",
            Self::SetAffinity { .. } => "set_affinity",
            Self::SetPreferences { .. } => "set_preferences",
            Self::Advance => "advance",
            Self::Back => "back",
            Self::JumpToStep { .. } => "jump_to_step",
            Self::Complete => "complete",
        }
    }
}
