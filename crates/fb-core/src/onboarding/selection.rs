//! Selection store.
//!
//! Holds the canonical [`OnboardingState`] and exposes the only mutations that
//! are allowed on it. Every operation leaves the invariants intact:
//!
//! - sport ranks form exactly `1..=N`, `N <= MAX_SELECTED_SPORTS`
//! - every team references a selected sport
//! - affinity scores stay within `1..=5`

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::rank::{self, RankCandidate, ReorderRequest};
use super::{
    AffinityScore, OnboardingState, OnboardingStep, PreferencesPatch, TeamSelection,
    MAX_SELECTED_SPORTS,
};
use crate::ids::{SportId, TeamId};

/// Invariant-rejection errors. State is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("cannot select more than {limit} sports (currently {current})")]
    SelectionLimitExceeded { current: usize, limit: usize },
    #[error("team {team_id} belongs to sport {sport_id}, which is not selected")]
    OrphanTeamSelection { team_id: TeamId, sport_id: SportId },
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    state: OnboardingState,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a state of unknown provenance, healing whatever can be healed:
    /// ranks are renormalized, repeated teams dropped, orphan teams removed,
    /// affinities clamped.
    pub fn from_state(mut state: OnboardingState) -> Self {
        let sports_before = state.selected_sports.clone();
        state.selected_sports = rank::normalize(&state.selected_sports);

        let selected: HashSet<SportId> = state.sport_ids().cloned().collect();
        let mut seen_teams = HashSet::new();
        let teams_before = state.selected_teams.len();
        state.selected_teams.retain(|team| {
            selected.contains(&team.sport_id) && seen_teams.insert(team.team_id.clone())
        });
        for team in &mut state.selected_teams {
            team.affinity_score = team.affinity_score.heal();
        }

        if sports_before != state.selected_sports || teams_before != state.selected_teams.len() {
            record_heal(&state, teams_before - state.selected_teams.len());
        }

        Self { state }
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn snapshot(&self) -> OnboardingState {
        self.state.clone()
    }

    pub fn into_state(self) -> OnboardingState {
        self.state
    }

    /// Deselects a selected sport (cascading to its teams) or appends an
    /// unselected one at rank `N + 1`.
    pub fn toggle_sport(&mut self, sport_id: &SportId) -> Result<OnboardingState, SelectionError> {
        if self.state.is_sport_selected(sport_id) {
            let remaining = self
                .state
                .selected_sports
                .iter()
                .filter(|sport| &sport.sport_id != sport_id)
                .cloned()
                .map(RankCandidate::from);
            self.state.selected_sports = rank::normalize_ranks(remaining, None);
            self.state
                .selected_teams
                .retain(|team| &team.sport_id != sport_id);
            return Ok(self.snapshot());
        }

        let current = self.state.selected_sports.len();
        if current >= MAX_SELECTED_SPORTS {
            return Err(SelectionError::SelectionLimitExceeded {
                current,
                limit: MAX_SELECTED_SPORTS,
            });
        }

        let candidates = self
            .state
            .selected_sports
            .iter()
            .cloned()
            .map(RankCandidate::from)
            .chain(std::iter::once(RankCandidate::unranked(sport_id.clone())));
        self.state.selected_sports = rank::normalize_ranks(candidates, None);
        Ok(self.snapshot())
    }

    /// Moves a selected sport to `to_index` (zero-based). No-op when the
    /// sport is not selected.
    pub fn reorder_sport(&mut self, sport_id: &SportId, to_index: usize) -> OnboardingState {
        if self.state.is_sport_selected(sport_id) {
            let request = ReorderRequest {
                sport_id: sport_id.clone(),
                to_index,
            };
            let candidates = self
                .state
                .selected_sports
                .iter()
                .cloned()
                .map(RankCandidate::from);
            self.state.selected_sports = rank::normalize_ranks(candidates, Some(&request));
        }
        self.snapshot()
    }

    /// Presence toggle for a team under a selected sport.
    pub fn toggle_team(
        &mut self,
        team_id: &TeamId,
        sport_id: &SportId,
        default_affinity: AffinityScore,
    ) -> Result<OnboardingState, SelectionError> {
        if !self.state.is_sport_selected(sport_id) {
            return Err(SelectionError::OrphanTeamSelection {
                team_id: team_id.clone(),
                sport_id: sport_id.clone(),
            });
        }

        if self.state.team(team_id).is_some() {
            self.state
                .selected_teams
                .retain(|team| &team.team_id != team_id);
        } else {
            self.state.selected_teams.push(TeamSelection {
                team_id: team_id.clone(),
                sport_id: sport_id.clone(),
                affinity_score: default_affinity,
            });
        }
        Ok(self.snapshot())
    }

    /// Sets a team's affinity, clamping into `1..=5`. No-op for unknown teams.
    pub fn set_team_affinity(&mut self, team_id: &TeamId, score: i64) -> OnboardingState {
        if let Some(team) = self
            .state
            .selected_teams
            .iter_mut()
            .find(|team| &team.team_id == team_id)
        {
            team.affinity_score = AffinityScore::clamped(score);
        }
        self.snapshot()
    }

    /// Merges a partial preferences update, initializing defaults first when
    /// no preferences exist yet.
    pub fn set_preferences(&mut self, patch: PreferencesPatch) -> OnboardingState {
        self.state
            .preferences
            .get_or_insert_with(Default::default)
            .merge(patch);
        self.snapshot()
    }

    /// Moves the step cursor. Gating is the caller's responsibility.
    pub fn move_to(&mut self, step: OnboardingStep) -> OnboardingState {
        self.state.current_step = step;
        self.snapshot()
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> OnboardingState {
        self.state.current_step = OnboardingStep::Completion;
        self.state.completed_at = Some(at);
        self.snapshot()
    }
}

#[cfg(feature = "tracing")]
fn record_heal(state: &OnboardingState, dropped_teams: usize) {
    tracing::debug!(
        sports = state.selected_sports.len(),
        dropped_teams,
        "healed onboarding selection"
    );
}

#[cfg(not(feature = "tracing"))]
fn record_heal(_state: &OnboardingState, _dropped_teams: usize) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::rank::is_canonical;
    use crate::onboarding::RankedSport;

    fn sport(id: &str) -> SportId {
        id.into()
    }

    fn store_with(sports: &[&str]) -> SelectionStore {
        let mut store = SelectionStore::new();
        for id in sports {
            store.toggle_sport(&sport(id)).unwrap();
        }
        store
    }

    #[test]
    fn toggle_appends_at_next_rank() {
        let store = store_with(&["nfl", "nba"]);
        assert_eq!(store.state().rank_of(&sport("nfl")), Some(1));
        assert_eq!(store.state().rank_of(&sport("nba")), Some(2));
    }

    #[test]
    fn toggle_off_renormalizes_and_removes_rank_entry() {
        let mut store = store_with(&["nfl", "nba", "mlb"]);
        let state = store.toggle_sport(&sport("nfl")).unwrap();

        assert!(!state.is_sport_selected(&sport("nfl")));
        assert_eq!(state.rank_of(&sport("nba")), Some(1));
        assert_eq!(state.rank_of(&sport("mlb")), Some(2));
        assert!(is_canonical(&state.selected_sports));
    }

    #[test]
    fn sixth_sport_is_rejected_without_changing_state() {
        let mut store = store_with(&["nfl", "nba", "mlb", "nhl", "mls"]);
        let before = store.snapshot();

        let err = store.toggle_sport(&sport("f1")).unwrap_err();

        assert_eq!(
            err,
            SelectionError::SelectionLimitExceeded {
                current: 5,
                limit: 5
            }
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn deselecting_sport_cascades_to_its_teams() {
        let mut store = store_with(&["nfl", "nba"]);
        store
            .toggle_team(&"patriots".into(), &sport("nfl"), AffinityScore::DEFAULT)
            .unwrap();
        store
            .toggle_team(&"jets".into(), &sport("nfl"), AffinityScore::DEFAULT)
            .unwrap();
        store
            .toggle_team(&"celtics".into(), &sport("nba"), AffinityScore::DEFAULT)
            .unwrap();

        let state = store.toggle_sport(&sport("nfl")).unwrap();

        assert_eq!(state.selected_teams.len(), 1);
        assert_eq!(state.selected_teams[0].team_id.as_str(), "celtics");
    }

    #[test]
    fn team_for_unselected_sport_is_orphan() {
        let mut store = store_with(&["nba"]);
        let err = store
            .toggle_team(&"patriots".into(), &sport("nfl"), AffinityScore::DEFAULT)
            .unwrap_err();
        assert!(matches!(err, SelectionError::OrphanTeamSelection { .. }));
        assert!(store.state().selected_teams.is_empty());
    }

    #[test]
    fn toggle_team_twice_removes_it() {
        let mut store = store_with(&["nfl"]);
        let team = TeamId::from("patriots");
        store
            .toggle_team(&team, &sport("nfl"), AffinityScore::DEFAULT)
            .unwrap();
        assert_eq!(
            store.state().team(&team).map(|t| t.affinity_score.value()),
            Some(3)
        );

        let state = store
            .toggle_team(&team, &sport("nfl"), AffinityScore::DEFAULT)
            .unwrap();
        assert!(state.team(&team).is_none());
    }

    #[test]
    fn affinity_is_clamped_and_ignored_for_unknown_team() {
        let mut store = store_with(&["nfl"]);
        let team = TeamId::from("patriots");
        store
            .toggle_team(&team, &sport("nfl"), AffinityScore::DEFAULT)
            .unwrap();

        let state = store.set_team_affinity(&team, 11);
        assert_eq!(state.team(&team).unwrap().affinity_score.value(), 5);

        let before = store.snapshot();
        let after = store.set_team_affinity(&"jets".into(), 2);
        assert_eq!(before, after);
    }

    #[test]
    fn reorder_moves_and_keeps_ranks_contiguous() {
        let mut store = store_with(&["nfl", "nba", "mlb"]);
        let state = store.reorder_sport(&sport("mlb"), 0);
        assert_eq!(state.rank_of(&sport("mlb")), Some(1));
        assert_eq!(state.rank_of(&sport("nfl")), Some(2));
        assert_eq!(state.rank_of(&sport("nba")), Some(3));

        let unchanged = store.reorder_sport(&sport("cricket"), 0);
        assert_eq!(unchanged, state);
    }

    #[test]
    fn set_preferences_initializes_defaults_then_merges() {
        let mut store = SelectionStore::new();
        let state = store.set_preferences(PreferencesPatch::default().news_type("injuries", true));
        let prefs = state.preferences.unwrap();
        assert!(prefs.news_types["injuries"].enabled);
        assert!(prefs.news_types.contains_key("breaking"));
    }

    #[test]
    fn from_state_heals_corrupted_selection() {
        let state = OnboardingState {
            selected_sports: vec![
                RankedSport {
                    sport_id: sport("nba"),
                    rank: 2,
                },
                RankedSport {
                    sport_id: sport("nfl"),
                    rank: 2,
                },
            ],
            selected_teams: vec![
                TeamSelection {
                    team_id: "patriots".into(),
                    sport_id: sport("nfl"),
                    affinity_score: AffinityScore::clamped(4),
                },
                TeamSelection {
                    team_id: "patriots".into(),
                    sport_id: sport("nfl"),
                    affinity_score: AffinityScore::clamped(1),
                },
                TeamSelection {
                    team_id: "dodgers".into(),
                    sport_id: sport("mlb"),
                    affinity_score: AffinityScore::clamped(5),
                },
            ],
            ..Default::default()
        };

        let healed = SelectionStore::from_state(state).into_state();

        assert!(is_canonical(&healed.selected_sports));
        assert_eq!(healed.rank_of(&sport("nba")), Some(1));
        assert_eq!(healed.rank_of(&sport("nfl")), Some(2));
        assert_eq!(healed.selected_teams.len(), 1);
        assert_eq!(healed.selected_teams[0].affinity_score.value(), 4);
    }

    #[test]
    fn mark_completed_sets_terminal_step_and_timestamp() {
        let mut store = SelectionStore::new();
        let at = Utc::now();
        let state = store.mark_completed(at);
        assert_eq!(state.current_step, OnboardingStep::Completion);
        assert_eq!(state.completed_at, Some(at));
    }
}
