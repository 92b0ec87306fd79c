//! CLI argument parsing

use crate::config::AnalyzerConfig;
use crate::models::OsKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Scan a directory tree and summarize its entries by type.
#[derive(Debug, Clone, Parser)]
#[command(name = "fsprofile", version, long_version = LONG_VERSION)]
pub struct CliArgs {
    /// Directory to scan (defaults to the filesystem root)
    pub path: Option<PathBuf>,

    /// Hidden-file convention: windows, linux (alias: unix)
    #[arg(long, value_name = "NAME")]
    pub os: Option<String>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where scan snapshots are kept
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Ignore any saved snapshot and scan again
    #[arg(long)]
    pub rescan: bool,

    /// Do not save a snapshot after scanning
    #[arg(long)]
    pub no_save: bool,

    /// Report progress every N files
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_files: Option<u64>,

    /// Report progress every N directories
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub progress_dirs: Option<u64>,

    /// Suppress progress and status output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// List every symbolic link with its target
    #[arg(long)]
    pub symlinks: bool,

    /// Number of entry types to list
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub top: usize,
}

impl CliArgs {
    /// Convention named by `--os`, or the host's.
    #[must_use]
    pub fn os_kind(&self) -> OsKind {
        self.os
            .as_deref()
            .map_or_else(OsKind::detect, OsKind::from_name)
    }

    /// Apply command-line overrides on top of file/default settings.
    pub fn apply_overrides(&self, config: &mut AnalyzerConfig) {
        if let Some(dir) = &self.snapshot_dir {
            config.snapshots.directory.clone_from(dir);
        }
        if self.rescan {
            config.snapshots.load = false;
        }
        if self.no_save {
            config.snapshots.save = false;
        }
        if let Some(n) = self.progress_files {
            config.progress.file_interval = n;
        }
        if let Some(n) = self.progress_dirs {
            config.progress.dir_interval = n;
        }
        if self.quiet {
            config.progress.enabled = false;
        }
    }
}

/// Parse an argument vector (first item is the program name).
///
/// # Errors
/// Returns the clap error for unknown flags or invalid values; `--help` and
/// `--version` also surface as errors of the matching kind.
pub fn parse_args<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCommit: ",
    env!("GIT_HASH"),
    " (",
    env!("GIT_DATE"),
    ")\nTarget: ",
    env!("BUILD_TARGET"),
);
