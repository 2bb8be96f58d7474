use std::sync::Arc;

use fb_core::ports::StorageSlotPort;
use tracing::{info_span, Instrument};

use crate::persistence::LocalPersistence;

/// Use case for re-onboarding.
///
/// Clears the persisted state so the next controller starts fresh at the
/// welcome step. Nothing is sent to the remote service.
pub struct ResetOnboarding {
    slot: Arc<dyn StorageSlotPort>,
}

impl ResetOnboarding {
    pub fn new(slot: Arc<dyn StorageSlotPort>) -> Self {
        Self { slot }
    }

    pub fn from_ports(slot: Arc<dyn StorageSlotPort>) -> Self {
        Self::new(slot)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let span = info_span!("usecase.reset_onboarding.execute", key = self.slot.key());
        LocalPersistence::new(Arc::clone(&self.slot))
            .clear()
            .instrument(span)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSlot {
        clears: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl StorageSlotPort for RecordingSlot {
        fn key(&self) -> &str {
            "test.onboarding"
        }

        async fn read(&self) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        async fn write(&self, _value: &str) -> anyhow::Result<()> {
            panic!("reset must not write");
        }

        async fn clear(&self) -> anyhow::Result<()> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("permission denied");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_execute_clears_slot() {
        let slot = Arc::new(RecordingSlot::default());

        ResetOnboarding::new(slot.clone()).execute().await.unwrap();

        assert_eq!(slot.clears.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_propagates_slot_errors() {
        let slot = Arc::new(RecordingSlot {
            fail: true,
            ..Default::default()
        });

        let err = ResetOnboarding::from_ports(slot)
            .execute()
            .await
            .unwrap_err();

        assert!(err.to_string().contains("permission denied"));
    }
}
