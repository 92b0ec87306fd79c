//! Accumulation of per-type statistics and summary helpers

use crate::models::{EntryRecord, EntryType, ErrorItem, ScanResult, ScanSummary};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// Count and own-size totals keyed by classification tag.
#[derive(Debug, Default)]
struct TypeTally {
    counts: HashMap<EntryType, u64>,
    sizes: HashMap<EntryType, u64>,
}

impl TypeTally {
    fn add(&mut self, entry_type: &EntryType, size_bytes: u64) {
        *self.counts.entry(entry_type.clone()).or_insert(0) += 1;
        *self.sizes.entry(entry_type.clone()).or_insert(0) += size_bytes;
    }

    /// Count map sorted by descending count, and the size map in the same key order.
    fn into_sorted(self) -> (IndexMap<EntryType, u64>, IndexMap<EntryType, u64>) {
        let counts = sort_by_count_desc(self.counts);
        let mut sizes = self.sizes;
        let sizes = counts
            .keys()
            .map(|key| (key.clone(), sizes.remove(key).unwrap_or(0)))
            .collect();
        (counts, sizes)
    }
}

/// Accumulator owned by a single scan. Every counter the summary reports
/// lives here; nothing outlives the call that created it.
#[derive(Debug, Default)]
pub struct ScanTally {
    pub directories_scanned: u64,
    pub file_entries_processed: u64,
    pub directory_symlinks_found: u64,
    pub skipped_access_errors: u64,
    pub access_errors: Vec<ErrorItem>,
    all: TypeTally,
    hidden: TypeTally,
    hidden_items: u64,
    hidden_size_bytes: u64,
}

impl ScanTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished record into the type maps (and hidden maps when hidden).
    pub fn record(&mut self, record: &EntryRecord) {
        self.all.add(&record.entry_type, record.size_bytes);
        if record.is_hidden {
            self.hidden.add(&record.entry_type, record.size_bytes);
            self.hidden_items += 1;
            self.hidden_size_bytes += record.size_bytes;
        }
    }

    /// Count a skipped access error and keep its details.
    pub fn record_access_error(&mut self, path: &Path, error: &std::io::Error) {
        self.skipped_access_errors += 1;
        self.access_errors.push(ErrorItem::from_io(path, error));
    }

    #[must_use]
    pub fn into_summary(self, target_directory: String) -> ScanSummary {
        let (file_types_summary, file_types_size_summary) = self.all.into_sorted();
        let (hidden_file_types_summary, hidden_file_types_size_summary) =
            self.hidden.into_sorted();

        ScanSummary {
            target_directory,
            total_directories_scanned: self.directories_scanned,
            total_file_entries_processed: self.file_entries_processed,
            total_directory_symlinks_found: self.directory_symlinks_found,
            skipped_access_errors: self.skipped_access_errors,
            file_types_summary,
            file_types_size_summary,
            hidden_file_types_summary,
            hidden_file_types_size_summary,
            total_hidden_items: self.hidden_items,
            total_hidden_size_bytes: self.hidden_size_bytes,
            access_errors: self.access_errors,
        }
    }
}

/// Order a count map by descending count; ties fall back to the tag text.
#[must_use]
pub fn sort_by_count_desc(counts: HashMap<EntryType, u64>) -> IndexMap<EntryType, u64> {
    let mut pairs: Vec<(EntryType, u64)> = counts.into_iter().collect();
    pairs.sort_by(|(a_type, a_count), (b_type, b_count)| {
        b_count
            .cmp(a_count)
            .then_with(|| a_type.as_tag().cmp(&b_type.as_tag()))
    });
    pairs.into_iter().collect()
}

/// The first `n` tags of a count-sorted map.
#[must_use]
pub fn top_types(counts: &IndexMap<EntryType, u64>, n: usize) -> Vec<(EntryType, u64)> {
    counts
        .iter()
        .take(n)
        .map(|(entry_type, count)| (entry_type.clone(), *count))
        .collect()
}

/// One row of the symlink category breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkCategory {
    pub entry_type: EntryType,
    pub label: &'static str,
    pub count: u64,
    pub own_size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymlinkBreakdown {
    pub categories: Vec<SymlinkCategory>,
    pub total_count: u64,
    pub total_own_size_bytes: u64,
}

/// Counts and own sizes of the symlink categories present in a summary.
#[must_use]
pub fn symlink_breakdown(summary: &ScanSummary) -> SymlinkBreakdown {
    const CATEGORIES: [(EntryType, &str); 4] = [
        (EntryType::Symlink, "Symlinks to Files"),
        (EntryType::SymlinkToDir, "Symlinks to Directories"),
        (EntryType::BrokenSymlink, "Broken Symlinks"),
        (EntryType::SymlinkError, "Symlinks with Errors"),
    ];

    let mut breakdown = SymlinkBreakdown::default();
    for (entry_type, label) in CATEGORIES {
        let count = summary
            .file_types_summary
            .get(&entry_type)
            .copied()
            .unwrap_or(0);
        if count == 0 {
            continue;
        }
        let own_size_bytes = summary
            .file_types_size_summary
            .get(&entry_type)
            .copied()
            .unwrap_or(0);

        breakdown.total_count += count;
        breakdown.total_own_size_bytes += own_size_bytes;
        breakdown.categories.push(SymlinkCategory {
            entry_type,
            label,
            count,
            own_size_bytes,
        });
    }
    breakdown
}

/// Every symlink record, file listing and directory listing alike, sorted by path.
#[must_use]
pub fn all_symlinks(result: &ScanResult) -> Vec<&EntryRecord> {
    let mut links: Vec<&EntryRecord> = result
        .entries
        .iter()
        .filter(|record| record.is_symlink)
        .chain(result.directory_symlinks.iter())
        .collect();
    links.sort_by(|a, b| a.path.cmp(&b.path));
    links
}
