//! Progress reporting primitives for the traversal engine.
//!
//! Progress is advisory: sinks observe counters but can never influence
//! classification or totals.

use crate::models::ProgressSnapshot;
use std::path::Path;

/// Receiver of progress snapshots emitted during a scan.
pub trait ProgressSink {
    /// Called whenever the throttler decides a snapshot is due.
    fn report(&mut self, snapshot: &ProgressSnapshot);

    /// Called once after the walk completes.
    fn finish(&mut self, _snapshot: &ProgressSnapshot) {}
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _snapshot: &ProgressSnapshot) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressSnapshot),
{
    fn report(&mut self, snapshot: &ProgressSnapshot) {
        self(snapshot);
    }
}

/// Count-based throttler governing progress emission.
///
/// A directory snapshot fires on the first directory and every
/// `dir_interval`-th one after; a file snapshot fires every
/// `file_interval`-th file. A missing interval disables that trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressThrottler {
    file_interval: Option<u64>,
    dir_interval: Option<u64>,
}

impl ProgressThrottler {
    #[must_use]
    pub fn new(file_interval: Option<u64>, dir_interval: Option<u64>) -> Self {
        Self {
            file_interval: file_interval.filter(|n| *n > 0),
            dir_interval: dir_interval.filter(|n| *n > 0),
        }
    }

    /// Throttler that never emits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.file_interval.is_some() || self.dir_interval.is_some()
    }

    /// Consider a snapshot after entering a directory.
    #[must_use]
    pub fn consider_directory(
        &self,
        directories_visited: u64,
        files_processed: u64,
        current: &Path,
    ) -> Option<ProgressSnapshot> {
        let interval = self.dir_interval?;
        if directories_visited == 1 || directories_visited % interval == 0 {
            return Some(ProgressSnapshot {
                directories_visited,
                files_processed,
                current_directory: Some(current.to_string_lossy().into_owned()),
            });
        }
        None
    }

    /// Consider a snapshot after processing a file entry.
    #[must_use]
    pub fn consider_file(
        &self,
        directories_visited: u64,
        files_processed: u64,
    ) -> Option<ProgressSnapshot> {
        let interval = self.file_interval?;
        if files_processed > 0 && files_processed % interval == 0 {
            return Some(ProgressSnapshot {
                directories_visited,
                files_processed,
                current_directory: None,
            });
        }
        None
    }
}
