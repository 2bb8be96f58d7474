//! Local persistence adapter.
//!
//! Owns the storage slot. The serialized, versioned envelope it writes there
//! is the durable source of truth for onboarding progress; the remote service
//! is only ever a best-effort mirror of it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fb_core::onboarding::{decode_state, encode_state, OnboardingState};
use fb_core::ports::StorageSlotPort;
use tracing::{debug, info, warn};

/// Non-fatal notice that local writes are not happening.
///
/// Once raised the adapter stays in memory-only mode for the rest of the
/// session; the in-memory state remains authoritative.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("local persistence degraded, progress is kept in memory only: {reason}")]
pub struct PersistenceDegraded {
    pub reason: String,
}

pub struct LocalPersistence {
    slot: Arc<dyn StorageSlotPort>,
    degraded: AtomicBool,
}

impl LocalPersistence {
    pub fn new(slot: Arc<dyn StorageSlotPort>) -> Self {
        Self {
            slot,
            degraded: AtomicBool::new(false),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Rehydrates the previous session.
    ///
    /// `None` means "no prior session": the slot is empty, unreadable, or
    /// holds a payload that fails to parse or carries another schema version.
    pub async fn load(&self) -> Option<OnboardingState> {
        let raw = match self.slot.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = self.slot.key(), "no persisted onboarding state");
                return None;
            }
            Err(err) => {
                warn!(key = self.slot.key(), error = %err, "failed to read onboarding state slot");
                return None;
            }
        };

        match decode_state(&raw) {
            Ok(state) => {
                info!(
                    key = self.slot.key(),
                    step = state.current_step.number(),
                    sports = state.selected_sports.len(),
                    teams = state.selected_teams.len(),
                    "rehydrated onboarding state"
                );
                Some(state)
            }
            Err(err) => {
                warn!(key = self.slot.key(), error = %err, "discarding unreadable onboarding state");
                None
            }
        }
    }

    /// Writes the state through to the slot.
    pub async fn save(&self, state: &OnboardingState) -> Result<(), PersistenceDegraded> {
        if self.is_degraded() {
            debug!(key = self.slot.key(), "memory-only mode, skipping local write");
            return Err(PersistenceDegraded {
                reason: "an earlier write failed in this session".to_string(),
            });
        }

        let result = match encode_state(state) {
            Ok(raw) => self.slot.write(&raw).await,
            Err(err) => Err(anyhow::Error::new(err).context("failed to serialize onboarding state")),
        };

        result.map_err(|err| {
            self.degraded.store(true, Ordering::Release);
            warn!(
                key = self.slot.key(),
                error = %err,
                "local write failed, switching to memory-only mode"
            );
            PersistenceDegraded {
                reason: format!("{err:#}"),
            }
        })
    }

    /// Removes the persisted state and leaves memory-only mode.
    pub async fn clear(&self) -> anyhow::Result<()> {
        self.slot.clear().await?;
        self.degraded.store(false, Ordering::Release);
        info!(key = self.slot.key(), "cleared onboarding state slot");
        Ok(())
    }
}
