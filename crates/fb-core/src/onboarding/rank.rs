//! Rank normalizer.
//!
//! Turns an arbitrary list of selected sports (any prior ranks, duplicates,
//! gaps, or no rank at all) into the canonical form: ranks exactly `1..=N`
//! in list order. Never fails; malformed input is healed.

use std::collections::HashSet;

use super::RankedSport;
use crate::ids::SportId;

/// A sport awaiting normalization. `rank: None` (or `Some(0)`) means never ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankCandidate {
    pub sport_id: SportId,
    pub rank: Option<u32>,
}

impl RankCandidate {
    pub fn unranked(sport_id: SportId) -> Self {
        Self {
            sport_id,
            rank: None,
        }
    }
}

impl From<RankedSport> for RankCandidate {
    fn from(sport: RankedSport) -> Self {
        Self {
            sport_id: sport.sport_id,
            rank: Some(sport.rank),
        }
    }
}

/// Explicit "move this sport to that position" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub sport_id: SportId,
    /// Zero-based target position; clamped to the end of the list.
    pub to_index: usize,
}

/// Produces canonical ranks.
///
/// Ordering: ranked candidates by prior rank (ties by insertion index), then
/// never-ranked candidates in insertion order, then the optional reorder is
/// applied. Repeated sport ids keep their first occurrence.
pub fn normalize_ranks(
    candidates: impl IntoIterator<Item = RankCandidate>,
    reorder: Option<&ReorderRequest>,
) -> Vec<RankedSport> {
    let mut seen = HashSet::new();
    let mut indexed: Vec<(usize, RankCandidate)> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.sport_id.clone()))
        .enumerate()
        .collect();

    indexed.sort_by_key(|(index, candidate)| match candidate.rank {
        Some(rank) if rank > 0 => (0u8, rank, *index),
        _ => (1u8, 0, *index),
    });

    let mut ordered: Vec<SportId> = indexed
        .into_iter()
        .map(|(_, candidate)| candidate.sport_id)
        .collect();

    if let Some(request) = reorder {
        if let Some(from) = ordered.iter().position(|id| *id == request.sport_id) {
            let sport_id = ordered.remove(from);
            let to = request.to_index.min(ordered.len());
            ordered.insert(to, sport_id);
        }
    }

    ordered
        .into_iter()
        .zip(1u32..)
        .map(|(sport_id, rank)| RankedSport { sport_id, rank })
        .collect()
}

/// Normalizes an existing list without any reorder request.
pub fn normalize(sports: &[RankedSport]) -> Vec<RankedSport> {
    normalize_ranks(sports.iter().cloned().map(RankCandidate::from), None)
}

/// True when ranks are exactly `1..=N` in list order with unique sport ids.
pub fn is_canonical(sports: &[RankedSport]) -> bool {
    let mut seen = HashSet::new();
    sports
        .iter()
        .zip(1u32..)
        .all(|(sport, expected)| sport.rank == expected && seen.insert(&sport.sport_id))
}
