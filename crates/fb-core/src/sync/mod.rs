//! Remote sync domain types.

use serde::Serialize;

/// Outcome of the latest sync attempt for one step.
///
/// Per attempt: `Idle -> Sending -> {Succeeded | Failed}`. `Idle` also covers
/// attempts skipped because no authenticated session exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed {
        reason: String,
    },
}

impl SyncStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Sending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
