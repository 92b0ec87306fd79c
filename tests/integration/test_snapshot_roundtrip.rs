//! Snapshot save/load round trips

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_simple_fixture, write_sized};
    use fsprofile::io::snapshot::{SNAPSHOT_FORMAT, SNAPSHOT_VERSION};
    use fsprofile::{OsKind, SnapshotStore, analyze};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_restores_identical_result() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_simple_fixture(temp_dir.path()).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        assert!(!store.scan_exists(&root));

        let result = analyze(&root, OsKind::Linux).unwrap();
        let saved_to = store.save_scan(&result, &root).unwrap();

        assert!(store.scan_exists(&root));
        assert_eq!(saved_to, store.snapshot_path(&root));

        let loaded = store.load_scan(&root).unwrap();
        assert_eq!(loaded, result);

        // Key order of the count-sorted maps survives the trip
        let original: Vec<_> = result.summary.file_types_summary.keys().collect();
        let restored: Vec<_> = loaded.summary.file_types_summary.keys().collect();
        assert_eq!(original, restored);
    }

    #[cfg(unix)]
    #[test]
    fn test_roundtrip_with_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let root = crate::fixtures::create_mixed_links_fixture(temp_dir.path()).unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        std::os::unix::fs::symlink("sub", root.join("sublink")).unwrap();
        std::os::unix::fs::symlink("self", root.join("self")).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let result = analyze(&root, OsKind::Linux).unwrap();
        store.save_scan(&result, &root).unwrap();

        assert_eq!(store.load_scan(&root), Some(result));
    }

    #[test]
    fn test_envelope_is_versioned_json() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("data");
        write_sized(&root.join("x.txt"), 5).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let result = analyze(&root, OsKind::Linux).unwrap();
        let path = store.save_scan(&result, &root).unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("scan_") && file_name.ends_with(".json"));

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["format"], SNAPSHOT_FORMAT);
        assert_eq!(value["version"], SNAPSHOT_VERSION);
        assert_eq!(value["source_path"], result.summary.target_directory.as_str());
        assert!(value["saved_at"].is_string());
        assert_eq!(value["entries"][0]["type"], ".txt");
        assert_eq!(value["summary"]["file_types_summary"][".txt"], 1);

        // Only the snapshot itself remains in the store
        let files: Vec<_> = fs::read_dir(store.directory()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_equivalent_paths_share_a_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("data");
        write_sized(&root.join("x.txt"), 5).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let result = analyze(&root, OsKind::Linux).unwrap();
        store.save_scan(&result, &root).unwrap();

        let spelled_differently = root.join("..").join("data").join(".");
        assert!(store.scan_exists(&spelled_differently));
        assert_eq!(store.load_scan(&spelled_differently), Some(result));
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("data");
        write_sized(&root.join("x.txt"), 5).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let first = analyze(&root, OsKind::Linux).unwrap();
        store.save_scan(&first, &root).unwrap();

        write_sized(&root.join("y.txt"), 9).unwrap();
        let second = analyze(&root, OsKind::Linux).unwrap();
        store.save_scan(&second, &root).unwrap();

        let loaded = store.load_scan(&root).unwrap();
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded, second);
    }

    #[test]
    fn test_different_roots_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        write_sized(&a.join("one.txt"), 1).unwrap();
        write_sized(&b.join("two.md"), 2).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let scan_a = analyze(&a, OsKind::Linux).unwrap();
        store.save_scan(&scan_a, &a).unwrap();

        assert!(!store.scan_exists(&b));
        assert!(store.load_scan(&b).is_none());
        assert_ne!(store.snapshot_path(&a), store.snapshot_path(&b));
    }

    #[cfg(unix)]
    #[test]
    fn test_roundtrip_keeps_bracketed_extensions_apart() {
        use fsprofile::EntryType;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("data");
        write_sized(&root.join("a.txt"), 100).unwrap();
        write_sized(&root.join("odd.<symlink>"), 1).unwrap();
        write_sized(&root.join("notes.<draft>"), 2).unwrap();
        std::os::unix::fs::symlink("a.txt", root.join("l")).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let result = analyze(&root, OsKind::Linux).unwrap();
        let summary = &result.summary;
        assert_eq!(summary.file_types_summary.get(&EntryType::Symlink), Some(&1));
        assert_eq!(summary.file_types_summary.len(), 4);

        let path = store.save_scan(&result, &root).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let keys = value["summary"]["file_types_summary"].as_object().unwrap();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[".<symlink>"], 1);

        let loaded = store.try_load_scan(&root).unwrap();
        assert_eq!(loaded, result);
    }

    #[cfg(unix)]
    #[test]
    fn test_roundtrip_with_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("data");
        let raw_name = OsStr::from_bytes(b"bad\xff.txt");
        write_sized(&root.join(raw_name), 3).unwrap();
        std::os::unix::fs::symlink(raw_name, root.join("to_bad")).unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("scans"));

        let result = analyze(&root, OsKind::Linux).unwrap();
        let entry = result
            .entries
            .iter()
            .find(|e| e.name.as_os_str() == raw_name)
            .unwrap();
        assert_eq!(entry.path, fs::canonicalize(&root).unwrap().join(raw_name));

        store.save_scan(&result, &root).unwrap();
        assert_eq!(store.load_scan(&root), Some(result));
    }
}
