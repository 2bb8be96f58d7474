use async_trait::async_trait;
use tokio::sync::RwLock;

use fb_core::ports::StorageSlotPort;

/// Storage slot kept in process memory, for tests and ephemeral sessions.
pub struct InMemoryStorageSlot {
    key: String,
    value: RwLock<Option<String>>,
}

impl InMemoryStorageSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: RwLock::new(None),
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: RwLock::new(Some(value.into())),
        }
    }

    pub async fn value(&self) -> Option<String> {
        self.value.read().await.clone()
    }
}

#[async_trait]
impl StorageSlotPort for InMemoryStorageSlot {
    fn key(&self) -> &str {
        &self.key
    }

    async fn read(&self) -> anyhow::Result<Option<String>> {
        Ok(self.value.read().await.clone())
    }

    async fn write(&self, value: &str) -> anyhow::Result<()> {
        *self.value.write().await = Some(value.to_string());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.value.write().await = None;
        Ok(())
    }
}
