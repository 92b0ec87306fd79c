//! Snapshot read/write operations
//!
//! Each scanned root gets one JSON snapshot file, named after a BLAKE3 hash of
//! the root's canonical path. Writes go through a temporary file in the store
//! directory that is renamed into place. The file is a versioned envelope:
//!
//! ```text
//! { "format": "fsprofile-snapshot", "version": 1, "source_path": "...",
//!   "saved_at": "...", "entries": [...], "directory_symlinks": [...],
//!   "summary": {...} }
//! ```
//!
//! Loading never fails the caller: anything unreadable resolves to `None`
//! and the caller performs a fresh scan.

use crate::models::{EntryRecord, ScanResult, ScanSummary};
use crate::services::resolve;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const SNAPSHOT_FORMAT: &str = "fsprofile-snapshot";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("No snapshot at {0}")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed snapshot {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot serialize snapshot {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is not a snapshot file (format '{found}')")]
    WrongFormat { path: PathBuf, found: String },

    #[error("Unsupported snapshot version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

impl SnapshotError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    format: &'a str,
    version: u32,
    source_path: &'a str,
    saved_at: String,
    entries: &'a [EntryRecord],
    directory_symlinks: &'a [EntryRecord],
    summary: &'a ScanSummary,
}

/// Just enough of the envelope to decide whether the rest can be parsed.
#[derive(Deserialize)]
struct SnapshotHeader {
    format: String,
    version: u32,
}

#[derive(Deserialize)]
struct SnapshotIn {
    source_path: String,
    #[serde(default)]
    saved_at: Option<String>,
    entries: Vec<EntryRecord>,
    directory_symlinks: Vec<EntryRecord>,
    summary: ScanSummary,
}

/// Directory of snapshot files, one per scanned root.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    directory: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Snapshot file that belongs to `target`, whether or not it exists.
    #[must_use]
    pub fn snapshot_path(&self, target: &Path) -> PathBuf {
        self.directory.join(snapshot_file_name(&canonical_key(target)))
    }

    /// True iff a snapshot exists for the canonical path of `target`.
    #[must_use]
    pub fn scan_exists(&self, target: &Path) -> bool {
        self.snapshot_path(target).is_file()
    }

    /// Persist a scan of `target`, replacing any earlier snapshot for it.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Io`] when the store directory or file cannot
    /// be written and [`SnapshotError::Serialize`] when encoding fails. No
    /// temporary file is left behind on failure.
    pub fn save_scan(&self, result: &ScanResult, target: &Path) -> Result<PathBuf, SnapshotError> {
        fs::create_dir_all(&self.directory)
            .map_err(|err| SnapshotError::io(&self.directory, err))?;

        let source_path = canonical_key(target);
        let path = self.directory.join(snapshot_file_name(&source_path));
        let envelope = SnapshotOut {
            format: SNAPSHOT_FORMAT,
            version: SNAPSHOT_VERSION,
            source_path: &source_path,
            saved_at: chrono::Utc::now().to_rfc3339(),
            entries: &result.entries,
            directory_symlinks: &result.directory_symlinks,
            summary: &result.summary,
        };

        // Removed on drop unless persisted.
        let mut temp = NamedTempFile::new_in(&self.directory)
            .map_err(|err| SnapshotError::io(&self.directory, err))?;
        let temp_path = temp.path().to_path_buf();
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer(&mut writer, &envelope).map_err(|err| SnapshotError::Serialize {
            path: path.clone(),
            source: err,
        })?;
        writer
            .flush()
            .map_err(|err| SnapshotError::io(&temp_path, err))?;
        drop(writer);

        temp.persist(&path)
            .map_err(|err| SnapshotError::io(&path, err.error))?;

        log::info!("Scan data saved to: {}", path.display());
        Ok(path)
    }

    /// Load the snapshot for `target`, or `None` when there is no usable one.
    #[must_use]
    pub fn load_scan(&self, target: &Path) -> Option<ScanResult> {
        match self.try_load_scan(target) {
            Ok(result) => Some(result),
            Err(SnapshotError::NotFound(path)) => {
                log::info!("No saved scan found at: {}", path.display());
                None
            }
            Err(err) => {
                log::warn!("Ignoring saved scan: {err}");
                None
            }
        }
    }

    /// Load the snapshot for `target`, reporting why it is unusable.
    ///
    /// A snapshot recorded for a different source path still loads; the
    /// mismatch is logged as a warning.
    ///
    /// # Errors
    /// Returns a [`SnapshotError`] describing a missing, unreadable,
    /// malformed or incompatible snapshot file.
    pub fn try_load_scan(&self, target: &Path) -> Result<ScanResult, SnapshotError> {
        let requested = canonical_key(target);
        let path = self.directory.join(snapshot_file_name(&requested));

        let bytes = read_snapshot_bytes(&path)?;

        let header: SnapshotHeader =
            serde_json::from_slice(&bytes).map_err(|err| SnapshotError::Malformed {
                path: path.clone(),
                source: err,
            })?;
        if header.format != SNAPSHOT_FORMAT {
            return Err(SnapshotError::WrongFormat {
                path,
                found: header.format,
            });
        }
        if header.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                path,
                found: header.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let stored: SnapshotIn =
            serde_json::from_slice(&bytes).map_err(|err| SnapshotError::Malformed {
                path: path.clone(),
                source: err,
            })?;

        if stored.source_path != requested {
            log::warn!(
                "Loaded scan was for '{}', but current request is for '{requested}'. Using loaded data anyway.",
                stored.source_path
            );
        }

        log::info!(
            "Scan data loaded from: {} (saved {})",
            path.display(),
            stored.saved_at.as_deref().unwrap_or("at an unknown time")
        );

        Ok(ScanResult {
            entries: stored.entries,
            directory_symlinks: stored.directory_symlinks,
            summary: stored.summary,
        })
    }
}

fn read_snapshot_bytes(path: &Path) -> Result<Vec<u8>, SnapshotError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(SnapshotError::io(path, err)),
    };

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|err| SnapshotError::io(path, err))?;
    Ok(bytes)
}

/// Canonical absolute path string used as the snapshot key.
///
/// Falls back to the lexically normalized absolute path when `target` cannot
/// be canonicalized (for instance because it no longer exists).
#[must_use]
pub fn canonical_key(target: &Path) -> String {
    let path = resolve::canonical_root(target).unwrap_or_else(|_| {
        let absolute = std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf());
        resolve::normalize_lexically(&absolute)
    });
    path.to_string_lossy().into_owned()
}

/// File name for a canonical key: `scan_<blake3 hex>.json`.
#[must_use]
pub fn snapshot_file_name(canonical_key: &str) -> String {
    let hash = blake3::hash(canonical_key.as_bytes());
    format!("scan_{}.json", hash.to_hex())
}
