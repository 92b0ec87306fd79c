//! Configuration management
//!
//! Settings are read from an optional TOML file and may be overridden by
//! command-line flags:
//!
//! ```toml
//! [progress]
//! enabled = true
//! file_interval = 500
//! dir_interval = 20
//!
//! [snapshots]
//! load = true
//! save = true
//! directory = "/var/cache/fsprofile"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_FILE_INTERVAL: u64 = 500;
const DEFAULT_DIR_INTERVAL: u64 = 20;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub progress: ProgressSettings,
    pub snapshots: SnapshotSettings,
}

/// Progress cadence in files processed and directories visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    pub enabled: bool,
    pub file_interval: u64,
    pub dir_interval: u64,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file_interval: DEFAULT_FILE_INTERVAL,
            dir_interval: DEFAULT_DIR_INTERVAL,
        }
    }
}

impl ProgressSettings {
    /// `(file_interval, dir_interval)` as the engine takes them; both `None`
    /// when progress is disabled.
    #[must_use]
    pub fn intervals(&self) -> (Option<u64>, Option<u64>) {
        if self.enabled {
            (Some(self.file_interval), Some(self.dir_interval))
        } else {
            (None, None)
        }
    }
}

/// Snapshot behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// Reuse an existing snapshot instead of scanning.
    pub load: bool,
    /// Write a snapshot after a fresh scan.
    pub save: bool,
    pub directory: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            load: true,
            save: true,
            directory: default_snapshot_directory(),
        }
    }
}

/// `<user cache dir>/fsprofile/scans`, or `./scan_data` when the platform has
/// no cache directory.
#[must_use]
pub fn default_snapshot_directory() -> PathBuf {
    dirs::cache_dir().map_or_else(
        || PathBuf::from("scan_data"),
        |dir| dir.join("fsprofile").join("scans"),
    )
}

impl AnalyzerConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`Error::Config`] on malformed TOML or invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Config`] when its contents are invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when an interval is zero or the snapshot
    /// directory is empty.
    pub fn validate(&self) -> Result<()> {
        if self.progress.file_interval == 0 {
            return Err(Error::Config(
                "progress.file_interval must be greater than zero".to_string(),
            ));
        }
        if self.progress.dir_interval == 0 {
            return Err(Error::Config(
                "progress.dir_interval must be greater than zero".to_string(),
            ));
        }
        if self.snapshots.directory.as_os_str().is_empty() {
            return Err(Error::Config(
                "snapshots.directory cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
