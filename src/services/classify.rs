//! Entry classification: regular files by extension, symlinks by their target

use crate::models::{EntryType, TargetPath, TargetType};
use crate::services::resolve::{self, TargetState};
use std::fs::Metadata;
use std::io;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Classification of a symlink and what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClassification {
    pub entry_type: EntryType,
    pub target_path: TargetPath,
    pub target_type: Option<TargetType>,
    pub target_size_bytes: Option<u64>,
}

impl LinkClassification {
    fn resolved(
        entry_type: EntryType,
        target: &Path,
        target_type: TargetType,
        target_size_bytes: Option<u64>,
    ) -> Self {
        Self {
            entry_type,
            target_path: TargetPath::Resolved(target.to_path_buf()),
            target_type: Some(target_type),
            target_size_bytes,
        }
    }

    /// Classification for a link whose metadata or target could not be read.
    #[must_use]
    pub fn failed(err: &io::Error) -> Self {
        Self {
            entry_type: EntryType::SymlinkError,
            target_path: TargetPath::Error(format!("Error: {err}")),
            target_type: None,
            target_size_bytes: None,
        }
    }
}

/// Whether link-unaware metadata describes a regular file, judged from the raw
/// mode bits where the platform exposes them.
#[cfg(unix)]
#[must_use]
#[allow(clippy::unnecessary_cast)]
pub fn is_regular_file(metadata: &Metadata) -> bool {
    rustix::fs::FileType::from_raw_mode(metadata.mode() as rustix::fs::RawMode)
        == rustix::fs::FileType::RegularFile
}

#[cfg(not(unix))]
#[must_use]
pub fn is_regular_file(metadata: &Metadata) -> bool {
    metadata.file_type().is_file()
}

/// Classify a symlink found in a directory's file listing.
#[must_use]
pub fn classify_file_link(link: &Path) -> LinkClassification {
    let target = match resolve::immediate_target(link) {
        Ok(target) => target,
        Err(err) => {
            log::warn!(
                "Error reading file symlink target for {}: {err}",
                link.display()
            );
            return LinkClassification::failed(&err);
        }
    };

    match resolve::inspect_target(&target) {
        Ok(TargetState::RegularFile { size_bytes }) => LinkClassification::resolved(
            EntryType::Symlink,
            &target,
            TargetType::for_file_name(&target),
            Some(size_bytes),
        ),
        Ok(TargetState::Directory) => LinkClassification::resolved(
            EntryType::SymlinkToDir,
            &target,
            TargetType::Directory,
            None,
        ),
        Ok(TargetState::Other) => LinkClassification::resolved(
            EntryType::Symlink,
            &target,
            TargetType::SpecialTarget,
            None,
        ),
        Ok(TargetState::Missing) => LinkClassification::resolved(
            EntryType::BrokenSymlink,
            &target,
            TargetType::Broken,
            None,
        ),
        Err(err) => {
            log::warn!(
                "Error resolving symlink {} -> {}: {err}",
                link.display(),
                target.display()
            );
            LinkClassification::failed(&err)
        }
    }
}

/// Classify a symlink found in a directory's sub-directory listing.
///
/// A target that exists but is not a directory keeps the plain `.<symlink>`
/// tag and is logged as an anomaly.
#[must_use]
pub fn classify_dir_link(link: &Path) -> LinkClassification {
    let target = match resolve::immediate_target(link) {
        Ok(target) => target,
        Err(err) => {
            log::warn!("Error reading dir symlink {}: {err}", link.display());
            return LinkClassification::failed(&err);
        }
    };

    match resolve::inspect_target(&target) {
        Ok(TargetState::Directory) => LinkClassification::resolved(
            EntryType::SymlinkToDir,
            &target,
            TargetType::Directory,
            None,
        ),
        Ok(TargetState::Missing) => LinkClassification::resolved(
            EntryType::BrokenSymlink,
            &target,
            TargetType::Broken,
            None,
        ),
        Ok(TargetState::RegularFile { size_bytes }) => {
            log::warn!(
                "Dir symlink {} points to non-dir {}",
                link.display(),
                target.display()
            );
            LinkClassification::resolved(
                EntryType::Symlink,
                &target,
                TargetType::for_file_name(&target),
                Some(size_bytes),
            )
        }
        Ok(TargetState::Other) => {
            log::warn!(
                "Dir symlink {} points to non-dir {}",
                link.display(),
                target.display()
            );
            LinkClassification::resolved(
                EntryType::Symlink,
                &target,
                TargetType::SpecialTarget,
                None,
            )
        }
        Err(err) => {
            log::warn!(
                "Error resolving dir symlink {} -> {}: {err}",
                link.display(),
                target.display()
            );
            LinkClassification::failed(&err)
        }
    }
}
