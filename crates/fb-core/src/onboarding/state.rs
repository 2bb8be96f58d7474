//! Onboarding state model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OnboardingStep;
use crate::ids::{SportId, TeamId};

/// Upper bound on the number of sports a user may rank.
pub const MAX_SELECTED_SPORTS: usize = 5;

/// News categories offered when preferences are first initialized.
pub const DEFAULT_NEWS_TYPES: [&str; 5] = ["breaking", "injuries", "trades", "scores", "analysis"];

/// Notification channels offered when preferences are first initialized.
pub const DEFAULT_NOTIFICATION_CHANNELS: [&str; 2] = ["push", "email"];

/// A selected sport with its preference rank (1 = most preferred).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RankedSport {
    pub sport_id: SportId,
    pub rank: u32,
}

/// Strength of attachment to a team, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffinityScore(u8);

impl AffinityScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Mid-scale value used when a team is first selected.
    pub const DEFAULT: Self = Self(3);

    /// Builds a score, silently clamping into `1..=5`.
    pub fn clamped(score: i64) -> Self {
        Self(score.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub(crate) fn heal(self) -> Self {
        Self::clamped(i64::from(self.0))
    }
}

impl Default for AffinityScore {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A selected team, always attached to a selected sport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamSelection {
    pub team_id: TeamId,
    pub sport_id: SportId,
    pub affinity_score: AffinityScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentFrequency {
    Minimal,
    #[default]
    Standard,
    Comprehensive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewsTypePreference {
    pub enabled: bool,
    pub priority: i32,
}

/// Content preferences chosen on the preferences step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Preferences {
    pub news_types: BTreeMap<String, NewsTypePreference>,
    pub notifications: BTreeMap<String, bool>,
    pub content_frequency: ContentFrequency,
}

impl Default for Preferences {
    fn default() -> Self {
        let news_types = DEFAULT_NEWS_TYPES
            .iter()
            .zip(1..)
            .map(|(category, priority)| {
                (
                    category.to_string(),
                    NewsTypePreference {
                        enabled: false,
                        priority,
                    },
                )
            })
            .collect();
        let notifications = DEFAULT_NOTIFICATION_CHANNELS
            .iter()
            .map(|channel| (channel.to_string(), false))
            .collect();

        Self {
            news_types,
            notifications,
            content_frequency: ContentFrequency::default(),
        }
    }
}

impl Preferences {
    pub fn has_enabled_news_type(&self) -> bool {
        self.news_types.values().any(|news| news.enabled)
    }

    /// Merges a partial update. Unknown categories are added; untouched keys are kept.
    pub fn merge(&mut self, patch: PreferencesPatch) {
        for (category, update) in patch.news_types {
            let next_priority = self.news_types.len() as i32 + 1;
            let entry = self
                .news_types
                .entry(category)
                .or_insert(NewsTypePreference {
                    enabled: false,
                    priority: next_priority,
                });
            if let Some(enabled) = update.enabled {
                entry.enabled = enabled;
            }
            if let Some(priority) = update.priority {
                entry.priority = priority;
            }
        }
        self.notifications.extend(patch.notifications);
        if let Some(frequency) = patch.content_frequency {
            self.content_frequency = frequency;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsTypePatch {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub priority: Option<i32>,
}

/// Partial preferences update raised by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default)]
    pub news_types: BTreeMap<String, NewsTypePatch>,
    #[serde(default)]
    pub notifications: BTreeMap<String, bool>,
    #[serde(default)]
    pub content_frequency: Option<ContentFrequency>,
}

impl PreferencesPatch {
    pub fn news_type(mut self, category: impl Into<String>, enabled: bool) -> Self {
        self.news_types.entry(category.into()).or_default().enabled = Some(enabled);
        self
    }

    pub fn news_priority(mut self, category: impl Into<String>, priority: i32) -> Self {
        self.news_types.entry(category.into()).or_default().priority = Some(priority);
        self
    }

    pub fn notification(mut self, channel: impl Into<String>, enabled: bool) -> Self {
        self.notifications.insert(channel.into(), enabled);
        self
    }

    pub fn frequency(mut self, frequency: ContentFrequency) -> Self {
        self.content_frequency = Some(frequency);
        self
    }
}

/// The onboarding selection state.
///
/// `selected_sports` is kept in rank order. Invariants are maintained by
/// [`SelectionStore`](super::SelectionStore); this type is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OnboardingState {
    pub current_step: OnboardingStep,
    pub selected_sports: Vec<RankedSport>,
    pub selected_teams: Vec<TeamSelection>,
    pub preferences: Option<Preferences>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl OnboardingState {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_sport_selected(&self, sport_id: &SportId) -> bool {
        self.selected_sports
            .iter()
            .any(|sport| &sport.sport_id == sport_id)
    }

    pub fn rank_of(&self, sport_id: &SportId) -> Option<u32> {
        self.selected_sports
            .iter()
            .find(|sport| &sport.sport_id == sport_id)
            .map(|sport| sport.rank)
    }

    pub fn team(&self, team_id: &TeamId) -> Option<&TeamSelection> {
        self.selected_teams
            .iter()
            .find(|team| &team.team_id == team_id)
    }

    pub fn sport_ids(&self) -> impl Iterator<Item = &SportId> {
        self.selected_sports.iter().map(|sport| &sport.sport_id)
    }
}
