//! Output formatting for CLI

use crate::models::{ProgressSnapshot, ScanResult, ScanSummary, TargetPath};
use crate::services::aggregate::{all_symlinks, symlink_breakdown, top_types};
use std::fmt::Write;

/// Summary as pretty-printed JSON.
///
/// # Errors
/// Propagates the serializer error; the summary's map keys are strings so
/// this does not fail in practice.
pub fn format_json(summary: &ScanSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// Human-readable summary: totals, the `top` most common entry types,
/// symlink categories, hidden totals and the `top` most common hidden types.
#[must_use]
pub fn format_text(summary: &ScanSummary, top: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Scan of {}", summary.target_directory);
    let _ = writeln!(
        out,
        "  Directories scanned:      {}",
        summary.total_directories_scanned
    );
    let _ = writeln!(
        out,
        "  File entries processed:   {}",
        summary.total_file_entries_processed
    );
    let _ = writeln!(
        out,
        "  Directory symlinks found: {}",
        summary.total_directory_symlinks_found
    );
    let _ = writeln!(
        out,
        "  Skipped (access errors):  {}",
        summary.skipped_access_errors
    );

    let types = top_types(&summary.file_types_summary, top);
    if !types.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<24} {:>10} {:>12}", "Type", "Count", "Size");
        let _ = writeln!(out, "{}", "-".repeat(48));
        for (entry_type, count) in types {
            let size = summary
                .file_types_size_summary
                .get(&entry_type)
                .copied()
                .unwrap_or(0);
            let _ = writeln!(
                out,
                "{:<24} {count:>10} {:>12}",
                entry_type.as_tag(),
                format_size(size)
            );
        }
    }

    let symlinks = symlink_breakdown(summary);
    if symlinks.total_count > 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Symlinks: {} ({})",
            symlinks.total_count,
            format_size(symlinks.total_own_size_bytes)
        );
        for category in &symlinks.categories {
            let _ = writeln!(
                out,
                "  {:<24} {:>10} {:>12}",
                category.label,
                category.count,
                format_size(category.own_size_bytes)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Hidden items: {} ({})",
        summary.total_hidden_items,
        format_size(summary.total_hidden_size_bytes)
    );

    let hidden_types = top_types(&summary.hidden_file_types_summary, top);
    if !hidden_types.is_empty() {
        let _ = writeln!(out, "{:<24} {:>10} {:>12}", "Hidden type", "Count", "Size");
        let _ = writeln!(out, "{}", "-".repeat(48));
        for (entry_type, count) in hidden_types {
            let size = summary
                .hidden_file_types_size_summary
                .get(&entry_type)
                .copied()
                .unwrap_or(0);
            let _ = writeln!(
                out,
                "{:<24} {count:>10} {:>12}",
                entry_type.as_tag(),
                format_size(size)
            );
        }
    }

    if !summary.access_errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors encountered: {}", summary.access_errors.len());
        for error in summary.access_errors.iter().take(5) {
            let _ = writeln!(out, "  {} [{}]: {}", error.path, error.code, error.message);
        }
        if summary.access_errors.len() > 5 {
            let _ = writeln!(out, "  ... and {} more", summary.access_errors.len() - 5);
        }
    }

    out
}

/// Every symlink (file and directory listings) sorted by path, with its
/// target details.
#[must_use]
pub fn format_symlink_list(result: &ScanResult) -> String {
    let links = all_symlinks(result);
    let mut out = String::new();

    if links.is_empty() {
        let _ = writeln!(out, "No symbolic links found.");
        return out;
    }

    let _ = writeln!(out, "Symbolic links: {}", links.len());
    for link in links {
        let _ = writeln!(out, "  {} [{}]", link.path.display(), link.entry_type);
        let _ = writeln!(out, "    own size: {}", format_size(link.size_bytes));
        match &link.symlink_target_path {
            Some(TargetPath::Error(message)) => {
                let _ = writeln!(out, "    target: {message}");
            }
            Some(target) => {
                if let Some(path) = target.as_path() {
                    let _ = writeln!(out, "    target: {}", path.display());
                }
            }
            None => {}
        }
        if let Some(target_type) = &link.symlink_target_type {
            let _ = writeln!(out, "    target type: {target_type}");
        }
        if let Some(size) = link.symlink_target_size_bytes {
            let _ = writeln!(out, "    target size: {}", format_size(size));
        }
    }
    out
}

/// One progress line for stderr.
#[must_use]
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    match &snapshot.current_directory {
        Some(dir) => format!(
            "[{} dirs, {} files] {dir}",
            snapshot.directories_visited, snapshot.files_processed
        ),
        None => format!(
            "[{} dirs, {} files] done",
            snapshot.directories_visited, snapshot.files_processed
        ),
    }
}

/// Binary-unit size string: `512 B`, `1.5 KiB`, `2.0 GiB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
