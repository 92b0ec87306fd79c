//! Hidden-attribute resolution per OS convention

use crate::models::OsKind;
use std::path::Path;

/// Decide whether `path` is hidden under the convention of `os`.
///
/// Never fails: unreadable attributes count as visible.
#[must_use]
pub fn is_hidden(path: &Path, os: OsKind) -> bool {
    match os {
        OsKind::Windows => has_hidden_attribute(path),
        OsKind::Linux => path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.')),
        OsKind::Unknown => false,
    }
}

#[cfg(windows)]
fn has_hidden_attribute(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_HIDDEN;

    match std::fs::metadata(path) {
        Ok(metadata) => metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0,
        Err(err) => {
            log::trace!("Cannot read attributes of {}: {err}", path.display());
            false
        }
    }
}

#[cfg(not(windows))]
fn has_hidden_attribute(path: &Path) -> bool {
    log::trace!(
        "Attribute bitmask unavailable on this host for {}",
        path.display()
    );
    false
}
