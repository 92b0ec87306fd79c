//! Immediate (one-hop) symlink target resolution

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// What the followed target of a symlink turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    RegularFile { size_bytes: u64 },
    Directory,
    /// Exists but is neither a regular file nor a directory.
    Other,
    Missing,
}

/// Absolute path `link` points to, without following any further links.
///
/// Relative link text is joined onto the link's parent directory and the
/// result is normalized lexically.
pub fn immediate_target(link: &Path) -> io::Result<PathBuf> {
    let raw = fs::read_link(link)?;
    let joined = match link.parent() {
        Some(parent) => parent.join(&raw),
        None => raw,
    };
    Ok(normalize_lexically(&joined))
}

/// Inspect a resolved target. A target that cannot be reached because a path
/// component does not exist (or is not a directory) is `Missing`; every other
/// failure, including a link loop reported by the OS, is returned as an error.
pub fn inspect_target(target: &Path) -> io::Result<TargetState> {
    match fs::metadata(target) {
        Ok(metadata) if metadata.is_file() => Ok(TargetState::RegularFile {
            size_bytes: metadata.len(),
        }),
        Ok(metadata) if metadata.is_dir() => Ok(TargetState::Directory),
        Ok(_) => Ok(TargetState::Other),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(TargetState::Missing)
        }
        Err(err) => Err(err),
    }
}

/// Canonical absolute form of a scan root, resolved once per scan.
///
/// On Windows the verbatim `\\?\` prefix is dropped for drive paths so stored
/// roots read like the paths users type.
pub fn canonical_root(path: &Path) -> io::Result<PathBuf> {
    let canonical = fs::canonicalize(path)?;

    #[cfg(windows)]
    {
        let text = canonical.to_string_lossy();
        if let Some(stripped) = text.strip_prefix(r"\\?\")
            && stripped.as_bytes().get(1) == Some(&b':')
        {
            return Ok(PathBuf::from(stripped));
        }
    }

    Ok(canonical)
}

/// Remove `.` components and fold `..` into their parent without touching the
/// filesystem. `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
