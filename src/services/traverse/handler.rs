//! Directory-level error handling strategy

use crate::services::aggregate::ScanTally;
use std::io;
use std::path::Path;

/// Decides what happens when a directory cannot be listed.
///
/// The walk itself always continues with the remaining siblings; the handler
/// only updates the accumulator it is handed.
pub trait DirectoryErrorHandler {
    fn on_directory_error(&mut self, path: &Path, error: &io::Error, tally: &mut ScanTally);
}

/// Default handler: log a warning, count the error, keep its details.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipAndCount;

impl DirectoryErrorHandler for SkipAndCount {
    fn on_directory_error(&mut self, path: &Path, error: &io::Error, tally: &mut ScanTally) {
        log::warn!(
            "Access denied or error reading directory: {}. Skipping. ({error})",
            path.display()
        );
        tally.record_access_error(path, error);
    }
}
