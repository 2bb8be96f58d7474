//! Local storage slot port
//!
//! A single namespaced key holding one serialized value. The slot knows
//! nothing about what it stores; serialization and schema checks live in
//! the persistence adapter that owns it.

use async_trait::async_trait;

#[async_trait]
pub trait StorageSlotPort: Send + Sync {
    /// Namespaced key identifying the slot.
    fn key(&self) -> &str;

    /// Read the raw value, `None` when the slot has never been written.
    async fn read(&self) -> anyhow::Result<Option<String>>;

    /// Overwrite the slot with `value`.
    async fn write(&self, value: &str) -> anyhow::Result<()>;

    /// Remove the value (for re-onboarding or tests).
    async fn clear(&self) -> anyhow::Result<()>;
}
