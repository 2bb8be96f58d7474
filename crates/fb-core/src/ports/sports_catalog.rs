use crate::ids::SportId;

/// Sports catalog collaborator.
///
/// The single source of truth for whether a sport carries team-level data.
pub trait SportsCatalogPort: Send + Sync {
    fn supports_teams(&self, sport_id: &SportId) -> bool;
}
