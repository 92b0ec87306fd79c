//! Traversal and classification engine.
//!
//! Walks a tree top-down from a canonicalized root and emits one record per
//! name seen in a directory listing:
//!
//! - sub-directories that are symlinks become directory-symlink records and
//!   are never descended into;
//! - every other non-directory name becomes an entry record, including names
//!   whose metadata cannot be read (tagged `.<error_processing>`);
//! - a directory that cannot be listed is handed to the
//!   [`DirectoryErrorHandler`] and the walk continues with its siblings.
//!
//! Names within a directory are visited in sorted order, so two scans of an
//! unchanged tree produce identical results.

pub mod handler;
pub mod progress;

pub use handler::{DirectoryErrorHandler, SkipAndCount};
pub use progress::{NoProgress, ProgressSink, ProgressThrottler};

use crate::models::{EntryRecord, EntryType, OsKind, ProgressSnapshot, ScanResult};
use crate::services::aggregate::ScanTally;
use crate::services::classify::{self, LinkClassification};
use crate::services::{hidden, resolve};
use crate::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-scan state. Created by [`Analyzer::analyze`] and consumed when the
/// result is built.
#[derive(Debug, Default)]
pub struct TraversalContext {
    pub tally: ScanTally,
    pub entries: Vec<EntryRecord>,
    pub directory_symlinks: Vec<EntryRecord>,
}

impl TraversalContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_result(self, target_directory: String) -> ScanResult {
        ScanResult {
            entries: self.entries,
            directory_symlinks: self.directory_symlinks,
            summary: self.tally.into_summary(target_directory),
        }
    }
}

/// A directory's listing split the way the walk consumes it.
#[derive(Debug, Default)]
struct Listing {
    /// Real sub-directories to descend into.
    subdirectories: Vec<OsString>,
    /// Sub-directory names that are symlinks.
    directory_links: Vec<OsString>,
    files: Vec<OsString>,
}

/// Configurable scanner. Holds the collaborators (progress sink, directory
/// error handler) but no scan state, so one analyzer can run many scans.
pub struct Analyzer {
    os: OsKind,
    throttler: ProgressThrottler,
    progress: Box<dyn ProgressSink>,
    error_handler: Box<dyn DirectoryErrorHandler>,
}

// Manual impl: the boxed collaborators are not `Debug`.
impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("os", &self.os)
            .field("throttler", &self.throttler)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Analyzer with no progress output and the skip-and-count error policy.
    #[must_use]
    pub fn new(os: OsKind) -> Self {
        Self {
            os,
            throttler: ProgressThrottler::disabled(),
            progress: Box::new(NoProgress),
            error_handler: Box::new(SkipAndCount),
        }
    }

    #[must_use]
    pub fn with_progress_intervals(
        mut self,
        file_interval: Option<u64>,
        dir_interval: Option<u64>,
    ) -> Self {
        self.throttler = ProgressThrottler::new(file_interval, dir_interval);
        self
    }

    #[must_use]
    pub fn with_progress_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    #[must_use]
    pub fn with_error_handler(mut self, handler: impl DirectoryErrorHandler + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    #[must_use]
    pub fn os(&self) -> OsKind {
        self.os
    }

    /// Scan the tree under `root`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] when the root is missing or not a
    /// directory, and [`Error::Io`] when it cannot be canonicalized.
    /// Failures below the root never abort the scan.
    pub fn analyze<P: AsRef<Path>>(&mut self, root: P) -> Result<ScanResult> {
        let root = root.as_ref();
        let root_display = root.to_string_lossy().to_string();

        let abs_root = match resolve::canonical_root(root) {
            Ok(path) => path,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::InvalidInput(format!(
                    "Path does not exist: {root_display}"
                )));
            }
            Err(err) => return Err(Error::Io(err)),
        };

        if !abs_root.is_dir() {
            return Err(Error::InvalidInput(format!(
                "Path is not a directory: {root_display}"
            )));
        }

        log::info!("Analyzing: {}", abs_root.display());

        let mut context = TraversalContext::new();
        let mut pending = vec![abs_root.clone()];

        while let Some(directory) = pending.pop() {
            let children = self.visit_directory(&directory, &mut context);
            pending.extend(children.into_iter().rev());
        }

        if self.throttler.is_enabled() {
            self.progress.finish(&ProgressSnapshot {
                directories_visited: context.tally.directories_scanned,
                files_processed: context.tally.file_entries_processed,
                current_directory: None,
            });
        }

        log::info!(
            "Directory scan complete. Processed {} directories and {} file entries.",
            context.tally.directories_scanned,
            context.tally.file_entries_processed
        );

        Ok(context.into_result(abs_root.to_string_lossy().into_owned()))
    }

    /// Process one directory and return the sub-directories to descend into.
    fn visit_directory(&mut self, current: &Path, context: &mut TraversalContext) -> Vec<PathBuf> {
        let Some(listing) = self.list_directory(current, context) else {
            return Vec::new();
        };

        context.tally.directories_scanned += 1;
        if let Some(snapshot) = self.throttler.consider_directory(
            context.tally.directories_scanned,
            context.tally.file_entries_processed,
            current,
        ) {
            self.progress.report(&snapshot);
        }

        for name in &listing.directory_links {
            let record = self.directory_symlink_record(&current.join(name), name);
            log::debug!(
                "Directory symlink: {} ({})",
                record.path.display(),
                record.entry_type
            );
            context.tally.directory_symlinks_found += 1;
            context.tally.record(&record);
            context.directory_symlinks.push(record);
        }

        for name in &listing.files {
            context.tally.file_entries_processed += 1;
            let record = self.file_record(&current.join(name), name, context);
            log::debug!(
                "File entry: {} ({}, {} bytes)",
                record.path.display(),
                record.entry_type,
                record.size_bytes
            );
            context.tally.record(&record);
            context.entries.push(record);

            if let Some(snapshot) = self.throttler.consider_file(
                context.tally.directories_scanned,
                context.tally.file_entries_processed,
            ) {
                self.progress.report(&snapshot);
            }
        }

        listing
            .subdirectories
            .iter()
            .map(|name| current.join(name))
            .collect()
    }

    /// Read and partition a directory. A name counts as a directory when it is
    /// one, or when it is a symlink whose followed target is one.
    fn list_directory(&mut self, current: &Path, context: &mut TraversalContext) -> Option<Listing> {
        let read_dir = match fs::read_dir(current) {
            Ok(read_dir) => read_dir,
            Err(err) => {
                self.error_handler
                    .on_directory_error(current, &err, &mut context.tally);
                return None;
            }
        };

        let mut listing = Listing::default();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.error_handler
                        .on_directory_error(current, &err, &mut context.tally);
                    continue;
                }
            };

            let name = entry.file_name();
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => listing.subdirectories.push(name),
                Ok(file_type) if file_type.is_symlink() => {
                    let points_to_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
                    if points_to_dir {
                        listing.directory_links.push(name);
                    } else {
                        listing.files.push(name);
                    }
                }
                _ => listing.files.push(name),
            }
        }

        listing.subdirectories.sort();
        listing.directory_links.sort();
        listing.files.sort();
        Some(listing)
    }

    fn directory_symlink_record(&self, path: &Path, name: &OsString) -> EntryRecord {
        let is_hidden = hidden::is_hidden(path, self.os);

        let (size_bytes, link) = match fs::symlink_metadata(path) {
            Ok(metadata) => (metadata.len(), classify::classify_dir_link(path)),
            Err(err) => {
                log::warn!("Error reading dir symlink {}: {err}", path.display());
                (0, LinkClassification::failed(&err))
            }
        };

        link_record(path, name, is_hidden, size_bytes, link)
    }

    fn file_record(
        &self,
        path: &Path,
        name: &OsString,
        context: &mut TraversalContext,
    ) -> EntryRecord {
        let is_hidden = hidden::is_hidden(path, self.os);

        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                log::warn!(
                    "Could not fully process/stat file: {}. Error: {err}. Skipping.",
                    path.display()
                );
                context.tally.record_access_error(path, &err);
                return EntryRecord {
                    path: path.to_path_buf(),
                    name: name.clone(),
                    is_symlink: false,
                    is_hidden,
                    size_bytes: 0,
                    entry_type: EntryType::ErrorProcessing,
                    symlink_target_path: None,
                    symlink_target_type: None,
                    symlink_target_size_bytes: None,
                };
            }
        };

        if metadata.file_type().is_symlink() {
            let link = classify::classify_file_link(path);
            return link_record(path, name, is_hidden, metadata.len(), link);
        }

        let entry_type = if classify::is_regular_file(&metadata) {
            EntryType::for_file_name(Path::new(name))
        } else {
            log::warn!(
                "Non-regular file '{}' ({:?}) found.",
                path.display(),
                metadata.file_type()
            );
            EntryType::NonFileType
        };

        EntryRecord {
            path: path.to_path_buf(),
            name: name.clone(),
            is_symlink: false,
            is_hidden,
            size_bytes: metadata.len(),
            entry_type,
            symlink_target_path: None,
            symlink_target_type: None,
            symlink_target_size_bytes: None,
        }
    }
}

fn link_record(
    path: &Path,
    name: &OsString,
    is_hidden: bool,
    size_bytes: u64,
    link: LinkClassification,
) -> EntryRecord {
    EntryRecord {
        path: path.to_path_buf(),
        name: name.clone(),
        is_symlink: true,
        is_hidden,
        size_bytes,
        entry_type: link.entry_type,
        symlink_target_path: Some(link.target_path),
        symlink_target_type: link.target_type,
        symlink_target_size_bytes: link.target_size_bytes,
    }
}

/// Scan `root` with default collaborators: no progress, skip-and-count errors.
///
/// # Errors
/// See [`Analyzer::analyze`].
pub fn analyze<P: AsRef<Path>>(root: P, os: OsKind) -> Result<ScanResult> {
    Analyzer::new(os).analyze(root)
}
