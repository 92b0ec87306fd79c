//! Filesystem Profiling Library
//!
//! This library walks a directory tree, classifies every entry (regular files by
//! extension, symlinks by what they point at, anomalies by what went wrong),
//! tallies counts and own sizes per type and per hidden status, and persists
//! scans keyed by the scanned root so repeated runs can skip the walk.

pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod services;

pub use io::snapshot::{SnapshotError, SnapshotStore};
pub use models::{
    EntryRecord, EntryType, ErrorItem, OsKind, ProgressSnapshot, ScanResult, ScanSummary,
    TargetPath, TargetType,
};
pub use services::hidden::is_hidden;
pub use services::traverse::{
    Analyzer, DirectoryErrorHandler, NoProgress, ProgressSink, SkipAndCount, analyze,
};

use thiserror::Error;

/// Custom error type for the library
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

pub type Result<T> = std::result::Result<T, Error>;
