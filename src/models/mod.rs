//! Data models for scan records, summaries, progress and errors

pub mod stored_path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const NO_EXTENSION: &str = ".<no_ext>";
const SYMLINK: &str = ".<symlink>";
const SYMLINK_TO_DIR: &str = ".<symlink_to_dir>";
const BROKEN_SYMLINK: &str = ".<broken_symlink>";
const SYMLINK_ERROR: &str = ".<symlink_error>";
const NON_FILE_TYPE: &str = ".<non_file_type>";
const ERROR_PROCESSING: &str = ".<error_processing>";

const TARGET_DIR: &str = ".<dir>";
const TARGET_BROKEN: &str = ".<broken>";
const TARGET_SPECIAL: &str = ".<special_target>";

/// Hidden-file convention used when resolving the hidden attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OsKind {
    Windows,
    Linux,
    #[default]
    Unknown,
}

impl OsKind {
    /// Map an OS identifier (`"Windows"`, `"Linux"`, anything else) to a convention.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" => OsKind::Windows,
            "linux" | "unix" => OsKind::Linux,
            _ => OsKind::Unknown,
        }
    }

    /// Convention of the host the binary was built for.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(windows) {
            OsKind::Windows
        } else if cfg!(target_os = "linux") {
            OsKind::Linux
        } else {
            OsKind::Unknown
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OsKind::Windows => "Windows",
            OsKind::Linux => "Linux",
            OsKind::Unknown => "Unknown",
        }
    }

    /// Default scan root for the convention, if there is one.
    #[must_use]
    pub fn default_root(&self) -> Option<PathBuf> {
        match self {
            OsKind::Windows => Some(PathBuf::from("C:\\")),
            OsKind::Linux => Some(PathBuf::from("/")),
            OsKind::Unknown => None,
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OsKind::from_name(s))
    }
}

/// Classification tag assigned to every record.
///
/// Tags render as the literal strings used in summaries (`.txt`, `.<symlink>`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EntryType {
    /// Regular file, keyed by its lower-cased extension (stored without the dot).
    Extension(String),
    NoExtension,
    Symlink,
    SymlinkToDir,
    BrokenSymlink,
    SymlinkError,
    NonFileType,
    ErrorProcessing,
}

impl EntryType {
    /// Tag for a regular file name, lower-casing the extension.
    #[must_use]
    pub fn for_file_name(name: &Path) -> Self {
        match extension_of(name) {
            Some(ext) => EntryType::Extension(ext),
            None => EntryType::NoExtension,
        }
    }

    #[must_use]
    pub fn as_tag(&self) -> Cow<'static, str> {
        match self {
            EntryType::Extension(ext) => Cow::Owned(format!(".{ext}")),
            EntryType::NoExtension => Cow::Borrowed(NO_EXTENSION),
            EntryType::Symlink => Cow::Borrowed(SYMLINK),
            EntryType::SymlinkToDir => Cow::Borrowed(SYMLINK_TO_DIR),
            EntryType::BrokenSymlink => Cow::Borrowed(BROKEN_SYMLINK),
            EntryType::SymlinkError => Cow::Borrowed(SYMLINK_ERROR),
            EntryType::NonFileType => Cow::Borrowed(NON_FILE_TYPE),
            EntryType::ErrorProcessing => Cow::Borrowed(ERROR_PROCESSING),
        }
    }

    /// True for the four symlink categories.
    #[must_use]
    pub fn is_symlink_category(&self) -> bool {
        matches!(
            self,
            EntryType::Symlink
                | EntryType::SymlinkToDir
                | EntryType::BrokenSymlink
                | EntryType::SymlinkError
        )
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_tag())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            NO_EXTENSION => EntryType::NoExtension,
            SYMLINK => EntryType::Symlink,
            SYMLINK_TO_DIR => EntryType::SymlinkToDir,
            BROKEN_SYMLINK => EntryType::BrokenSymlink,
            SYMLINK_ERROR => EntryType::SymlinkError,
            NON_FILE_TYPE => EntryType::NonFileType,
            ERROR_PROCESSING => EntryType::ErrorProcessing,
            other => EntryType::Extension(parse_extension_tag(other)?),
        };
        Ok(kind)
    }
}

impl From<EntryType> for String {
    fn from(value: EntryType) -> Self {
        value.as_tag().into_owned()
    }
}

impl TryFrom<String> for EntryType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Classification of what a symlink points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TargetType {
    Extension(String),
    NoExtension,
    Directory,
    Broken,
    SpecialTarget,
}

impl TargetType {
    #[must_use]
    pub fn for_file_name(name: &Path) -> Self {
        match extension_of(name) {
            Some(ext) => TargetType::Extension(ext),
            None => TargetType::NoExtension,
        }
    }

    #[must_use]
    pub fn as_tag(&self) -> Cow<'static, str> {
        match self {
            TargetType::Extension(ext) => Cow::Owned(format!(".{ext}")),
            TargetType::NoExtension => Cow::Borrowed(NO_EXTENSION),
            TargetType::Directory => Cow::Borrowed(TARGET_DIR),
            TargetType::Broken => Cow::Borrowed(TARGET_BROKEN),
            TargetType::SpecialTarget => Cow::Borrowed(TARGET_SPECIAL),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_tag())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            NO_EXTENSION => TargetType::NoExtension,
            TARGET_DIR => TargetType::Directory,
            TARGET_BROKEN => TargetType::Broken,
            TARGET_SPECIAL => TargetType::SpecialTarget,
            other => TargetType::Extension(parse_extension_tag(other)?),
        };
        Ok(kind)
    }
}

impl From<TargetType> for String {
    fn from(value: TargetType) -> Self {
        value.as_tag().into_owned()
    }
}

impl TryFrom<String> for TargetType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lower-cased extension of the final path component.
///
/// Names such as `.bashrc` or `archive.` have no extension. Angle brackets
/// (and `%`) are percent-escaped so no extension tag can take the reserved
/// `.<...>` form.
fn extension_of(name: &Path) -> Option<String> {
    name.extension()
        .map(|ext| escape_extension(&ext.to_string_lossy().to_lowercase()))
        .filter(|ext| !ext.is_empty())
}

fn escape_extension(ext: &str) -> String {
    let mut escaped = String::with_capacity(ext.len());
    for c in ext.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '<' => escaped.push_str("%3c"),
            '>' => escaped.push_str("%3e"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Extension part of a non-reserved tag, kept verbatim.
fn parse_extension_tag(tag: &str) -> Result<String, String> {
    let ext = tag
        .strip_prefix('.')
        .ok_or_else(|| format!("classification tag must start with '.': {tag}"))?;
    if ext.is_empty() || ext.contains(['<', '>']) {
        return Err(format!("unknown classification tag: {tag}"));
    }
    Ok(ext.to_string())
}

/// Where a symlink points, or why that could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPath {
    Resolved(#[serde(with = "stored_path")] PathBuf),
    Error(String),
}

impl TargetPath {
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TargetPath::Resolved(path) => Some(path),
            TargetPath::Error(_) => None,
        }
    }
}

/// One file-like item (or directory symlink) observed during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(with = "stored_path")]
    pub path: PathBuf,
    #[serde(with = "stored_path")]
    pub name: OsString,
    pub is_symlink: bool,
    pub is_hidden: bool,
    /// Own size: the file's length, or the link's length for symlinks.
    pub size_bytes: u64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub symlink_target_path: Option<TargetPath>,
    pub symlink_target_type: Option<TargetType>,
    pub symlink_target_size_bytes: Option<u64>,
}

/// Represents an access error encountered during scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl ErrorItem {
    #[must_use]
    pub fn from_io(path: &Path, error: &std::io::Error) -> Self {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        Self {
            path: path.to_string_lossy().into_owned(),
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Aggregated statistics for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub target_directory: String,
    pub total_directories_scanned: u64,
    pub total_file_entries_processed: u64,
    pub total_directory_symlinks_found: u64,
    pub skipped_access_errors: u64,
    /// Count per tag, highest count first.
    pub file_types_summary: IndexMap<EntryType, u64>,
    pub file_types_size_summary: IndexMap<EntryType, u64>,
    pub hidden_file_types_summary: IndexMap<EntryType, u64>,
    pub hidden_file_types_size_summary: IndexMap<EntryType, u64>,
    pub total_hidden_items: u64,
    pub total_hidden_size_bytes: u64,
    #[serde(default)]
    pub access_errors: Vec<ErrorItem>,
}

/// Everything a scan produces: file records, directory symlinks and the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub entries: Vec<EntryRecord>,
    pub directory_symlinks: Vec<EntryRecord>,
    pub summary: ScanSummary,
}

impl ScanResult {
    #[must_use]
    pub fn into_parts(self) -> (Vec<EntryRecord>, Vec<EntryRecord>, ScanSummary) {
        (self.entries, self.directory_symlinks, self.summary)
    }

    /// Number of records across both collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.len() + self.directory_symlinks.len()
    }
}

/// Point-in-time progress counters delivered to a progress sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub directories_visited: u64,
    pub files_processed: u64,
    pub current_directory: Option<String>,
}
