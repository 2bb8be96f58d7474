//! File-backed storage slot.
//!
//! One JSON file per slot key under the data directory. Writes go to a
//! sibling temp file that is then renamed over the target, so the slot holds
//! either the previous value or the complete new one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use fb_core::ports::StorageSlotPort;

pub struct FileStorageSlot {
    key: String,
    path: PathBuf,
}

impl FileStorageSlot {
    /// Slot `key` stored at `<dir>/<key>.json`.
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        let key = key.into();
        let path = dir.as_ref().join(format!("{key}.json"));
        Self { key, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create slot dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    async fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp slot failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp slot to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl StorageSlotPort for FileStorageSlot {
    fn key(&self) -> &str {
        &self.key
    }

    async fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read slot failed: {}", self.path.display())),
        }
    }

    async fn write(&self, value: &str) -> Result<()> {
        self.atomic_write(value).await
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("remove slot failed: {}", self.path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_returns_none_when_file_not_exists() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileStorageSlot::new(temp_dir.path(), "fanboard.onboarding");

        assert_eq!(slot.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileStorageSlot::new(temp_dir.path().join("nested"), "fanboard.onboarding");

        slot.write(r#"{"schemaVersion":1}"#).await.unwrap();

        assert_eq!(
            slot.read().await.unwrap().as_deref(),
            Some(r#"{"schemaVersion":1}"#)
        );
        assert!(slot.path().ends_with("nested/fanboard.onboarding.json"));
        assert!(!slot.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileStorageSlot::new(temp_dir.path(), "slot");

        slot.write("first").await.unwrap();
        slot.write("second").await.unwrap();

        assert_eq!(slot.read().await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileStorageSlot::new(temp_dir.path(), "slot");
        slot.write("value").await.unwrap();

        slot.clear().await.unwrap();
        slot.clear().await.unwrap();

        assert_eq!(slot.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let slot = FileStorageSlot::new(&blocker, "slot");

        let err = slot.write("value").await.unwrap_err();

        assert!(err.to_string().contains("create slot dir failed"));
    }
}
