//! Static sports catalog.
//!
//! Which sports carry team-level data is a per-sport flag loaded from the
//! `[catalog]` config section. Nothing else decides it.

use std::collections::HashSet;

use fb_core::ports::SportsCatalogPort;
use fb_core::{AppConfig, SportId};

#[derive(Debug, Clone, Default)]
pub struct StaticSportsCatalog {
    team_sports: HashSet<SportId>,
}

impl StaticSportsCatalog {
    pub fn new<I, S>(team_sports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SportId>,
    {
        Self {
            team_sports: team_sports.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.team_sports.iter().cloned())
    }
}

impl SportsCatalogPort for StaticSportsCatalog {
    fn supports_teams(&self, sport_id: &SportId) -> bool {
        self.team_sports.contains(sport_id)
    }
}
