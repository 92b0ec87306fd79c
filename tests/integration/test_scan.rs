//! End-to-end scans of regular-file trees

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_simple_fixture, write_sized};
    use fsprofile::{EntryType, Error, OsKind, analyze};
    use std::fs;
    use tempfile::TempDir;

    fn rs() -> EntryType {
        EntryType::Extension("rs".to_string())
    }

    #[test]
    fn test_scan_classifies_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_simple_fixture(temp_dir.path()).unwrap();

        let result = analyze(&root, OsKind::Linux).unwrap();
        let summary = &result.summary;

        // tree, docs, src, src/util
        assert_eq!(summary.total_directories_scanned, 4);
        assert_eq!(summary.total_file_entries_processed, 6);
        assert_eq!(summary.total_directory_symlinks_found, 0);
        assert_eq!(summary.skipped_access_errors, 0);
        assert!(result.directory_symlinks.is_empty());

        assert_eq!(summary.file_types_summary.get(&rs()), Some(&3));
        assert_eq!(summary.file_types_size_summary.get(&rs()), Some(&1792));
        assert_eq!(
            summary.file_types_summary.get(&EntryType::NoExtension),
            Some(&2)
        );
        assert_eq!(
            summary
                .file_types_summary
                .get(&EntryType::Extension("md".to_string())),
            Some(&1)
        );

        // Most common type first
        let first = summary.file_types_summary.keys().next().unwrap();
        assert_eq!(first, &rs());
    }

    #[test]
    fn test_scan_records_are_sorted_and_complete() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_simple_fixture(temp_dir.path()).unwrap();

        let result = analyze(&root, OsKind::Linux).unwrap();
        let names: Vec<&str> = result
            .entries
            .iter()
            .map(|e| e.name.to_str().unwrap())
            .collect();

        assert_eq!(
            names,
            vec![".env", "Makefile", "readme.md", "lib.RS", "main.rs", "io.rs"]
        );

        let canonical = fs::canonicalize(&root).unwrap();
        for entry in &result.entries {
            assert!(entry.path.starts_with(&canonical));
            // Summary and records spell the root the same way
            assert!(entry
                .path
                .to_string_lossy()
                .starts_with(&result.summary.target_directory));
            assert!(!entry.is_symlink);
            assert!(entry.symlink_target_path.is_none());
            assert!(entry.symlink_target_size_bytes.is_none());
        }

        let counted: u64 = result.summary.file_types_summary.values().sum();
        assert_eq!(counted as usize, result.record_count());
    }

    #[test]
    fn test_scan_sizes_add_up() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_simple_fixture(temp_dir.path()).unwrap();

        let result = analyze(&root, OsKind::Linux).unwrap();
        let listed: u64 = result.entries.iter().map(|e| e.size_bytes).sum();
        let summed: u64 = result.summary.file_types_size_summary.values().sum();

        assert_eq!(listed, 13 + 7 + 20 + 1024 + 512 + 256);
        assert_eq!(listed, summed);
    }

    #[test]
    fn test_scan_hidden_totals_follow_os_convention() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_simple_fixture(temp_dir.path()).unwrap();

        let linux = analyze(&root, OsKind::Linux).unwrap();
        assert_eq!(linux.summary.total_hidden_items, 1);
        assert_eq!(linux.summary.total_hidden_size_bytes, 7);
        assert_eq!(
            linux
                .summary
                .hidden_file_types_summary
                .get(&EntryType::NoExtension),
            Some(&1)
        );

        let unknown = analyze(&root, OsKind::Unknown).unwrap();
        assert_eq!(unknown.summary.total_hidden_items, 0);
        assert!(unknown.summary.hidden_file_types_summary.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = analyze(temp_dir.path(), OsKind::Linux).unwrap();
        let summary = &result.summary;

        assert!(result.entries.is_empty());
        assert_eq!(summary.total_directories_scanned, 1);
        assert_eq!(summary.total_file_entries_processed, 0);
        assert_eq!(summary.skipped_access_errors, 0);
        assert!(summary.file_types_summary.is_empty());
        assert!(summary.file_types_size_summary.is_empty());
        assert_eq!(summary.total_hidden_items, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_target_directory_is_canonical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a");
        write_sized(&root.join("f.bin"), 1).unwrap();

        let result = analyze(root.join("../a/."), OsKind::Linux).unwrap();
        let canonical = fs::canonicalize(&root).unwrap();

        assert_eq!(
            result.summary.target_directory,
            canonical.to_string_lossy()
        );
    }

    #[test]
    fn test_scan_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_simple_fixture(temp_dir.path()).unwrap();

        let first = analyze(&root, OsKind::Linux).unwrap();
        let second = analyze(&root, OsKind::Linux).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();

        let err = analyze(temp_dir.path().join("nope"), OsKind::Linux).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
    }

    #[test]
    fn test_scan_rejects_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        write_sized(&file, 4).unwrap();

        let err = analyze(&file, OsKind::Linux).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
