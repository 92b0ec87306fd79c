//! Unit tests for CLI argument parsing

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use fsprofile::OsKind;
    use fsprofile::cli::args::parse_args;
    use fsprofile::config::AnalyzerConfig;
    use std::path::PathBuf;

    #[test]
    fn parse_defaults() {
        let args = parse_args(["fsprofile"]).expect("parse bare invocation");

        assert!(args.path.is_none());
        assert!(!args.rescan && !args.no_save && !args.quiet && !args.json);
        assert!(!args.symlinks);
        assert_eq!(args.top, 10);
        assert_eq!(args.os_kind(), OsKind::detect());
    }

    #[test]
    fn parse_full_invocation() {
        let args = parse_args([
            "fsprofile",
            "/srv/data",
            "--os",
            "Windows",
            "--snapshot-dir",
            "/tmp/scans",
            "--rescan",
            "--progress-files",
            "100",
            "--progress-dirs",
            "5",
            "--json",
            "--symlinks",
            "--top",
            "3",
        ])
        .expect("parse scan args");

        assert_eq!(args.path, Some(PathBuf::from("/srv/data")));
        assert_eq!(args.os_kind(), OsKind::Windows);
        assert_eq!(args.snapshot_dir, Some(PathBuf::from("/tmp/scans")));
        assert!(args.rescan);
        assert_eq!(args.progress_files, Some(100));
        assert_eq!(args.progress_dirs, Some(5));
        assert!(args.json);
        assert!(args.symlinks);
        assert_eq!(args.top, 3);
    }

    #[test]
    fn parse_rejects_zero_interval() {
        let err = parse_args(["fsprofile", "--progress-files", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        let err = parse_args(["fsprofile", "--legacy-traversal"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn unknown_os_name_has_no_hidden_convention() {
        let args = parse_args(["fsprofile", "--os", "plan9"]).unwrap();
        assert_eq!(args.os_kind(), OsKind::Unknown);
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let args = parse_args([
            "fsprofile",
            "--snapshot-dir",
            "elsewhere",
            "--rescan",
            "--no-save",
            "--progress-dirs",
            "7",
        ])
        .unwrap();

        let mut config = AnalyzerConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.snapshots.directory, PathBuf::from("elsewhere"));
        assert!(!config.snapshots.load);
        assert!(!config.snapshots.save);
        assert_eq!(config.progress.dir_interval, 7);
        assert_eq!(config.progress.file_interval, 500);
        assert!(config.progress.enabled);
    }

    #[test]
    fn quiet_disables_progress() {
        let args = parse_args(["fsprofile", "-q"]).unwrap();
        let mut config = AnalyzerConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.progress.intervals(), (None, None));
    }
}
