//! Filesystem profiler (fsprofile) - Main binary entry point

use clap::error::ErrorKind;
use fsprofile::cli::args::{CliArgs, parse_args};
use fsprofile::cli::output::{format_json, format_progress, format_symlink_list, format_text};
use fsprofile::config::AnalyzerConfig;
use fsprofile::models::{ProgressSnapshot, ScanResult};
use fsprofile::{Analyzer, Error, SnapshotStore};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug fsprofile /path
    env_logger::init();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 2,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    process::exit(run(&args));
}

fn run(args: &CliArgs) -> i32 {
    let os = args.os_kind();

    let mut config = match args.config.as_deref() {
        Some(path) => match AnalyzerConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {err}");
                return exit_code(&err);
            }
        },
        None => AnalyzerConfig::default(),
    };
    args.apply_overrides(&mut config);
    if let Err(err) = config.validate() {
        eprintln!("Error: {err}");
        return exit_code(&err);
    }

    let Some(root) = args.path.clone().or_else(|| os.default_root()) else {
        eprintln!("Error: no path given and no default root for OS '{os}'");
        return 2;
    };

    let store = SnapshotStore::new(&config.snapshots.directory);

    let loaded = if config.snapshots.load && store.scan_exists(&root) {
        store.load_scan(&root)
    } else {
        None
    };

    let result = if let Some(result) = loaded {
        if !args.quiet {
            eprintln!("Using saved scan for: {}", root.display());
        }
        result
    } else {
        match scan(&root, args, &config) {
            Ok(result) => {
                if config.snapshots.save {
                    save(&store, &result, &root, args.quiet);
                }
                result
            }
            Err(err) => {
                eprintln!("Error: {err}");
                return exit_code(&err);
            }
        }
    };

    if args.json {
        match format_json(&result.summary) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Error: {err}");
                return 4;
            }
        }
    } else {
        print!("{}", format_text(&result.summary, args.top));
        if args.symlinks {
            println!();
            print!("{}", format_symlink_list(&result));
        }
    }

    if result.summary.skipped_access_errors > 0 {
        3 // Partial failure
    } else {
        0
    }
}

fn scan(root: &Path, args: &CliArgs, config: &AnalyzerConfig) -> fsprofile::Result<ScanResult> {
    let (file_interval, dir_interval) = config.progress.intervals();
    let mut analyzer =
        Analyzer::new(args.os_kind()).with_progress_intervals(file_interval, dir_interval);

    if !args.quiet {
        analyzer = analyzer.with_progress_sink(|snapshot: &ProgressSnapshot| {
            eprintln!("{}", format_progress(snapshot));
        });
        eprintln!("Scanning: {}", root.display());
    }

    analyzer.analyze(root)
}

fn save(store: &SnapshotStore, result: &ScanResult, root: &Path, quiet: bool) {
    match persist(store, result, root) {
        Ok(path) => {
            if !quiet {
                eprintln!("Snapshot saved: {} ({} records)", path.display(), result.record_count());
            }
        }
        Err(err) => log::warn!("Could not save scan data: {err}"),
    }
}

fn persist(store: &SnapshotStore, result: &ScanResult, root: &Path) -> fsprofile::Result<PathBuf> {
    Ok(store.save_scan(result, root)?)
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::InvalidInput(_) | Error::Config(_) => 2,
        _ => 4,
    }
}
