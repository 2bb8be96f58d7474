use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Storage slot key used when the config does not name one.
pub const DEFAULT_SLOT_KEY: &str = "fanboard.onboarding";

/// Get the Fanboard application data root directory.
///
/// # Platform-specific Paths
/// - macOS: ~/Library/Application Support/Fanboard
/// - Windows: %APPDATA%\Fanboard
/// - Linux: $XDG_DATA_HOME/Fanboard or ~/.local/share/Fanboard
///
/// This function does not create the directory; the caller decides when to.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to get platform-specific data directory")?;
    Ok(base_dir.join("Fanboard"))
}

/// Log directory under a data root.
pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}
