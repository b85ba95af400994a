//! One-shot importer: scan directories into the dayalbum catalog without
//! starting the server.
//!
//! ## Usage
//!
//! ```bash
//! dayalbum-scan ~/Pictures/Holiday              # Import one album
//! dayalbum-scan -c ./dayalbum.toml a/ b/ c/     # Several, with a config file
//! ```
//!
//! Each directory becomes (or refreshes) the album named after it. A failed
//! directory is reported and the rest still run; the exit code is non-zero
//! if any failed.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use dayalbum::config::Config;
use dayalbum::db::Database;
use dayalbum::logging;
use dayalbum::scanner::{import_album, validate_album_dir, ScanProgress, Scanner};

#[derive(Default)]
struct ScanArgs {
    config_path: Option<PathBuf>,
    directories: Vec<String>,
    /// Suppress per-file progress lines.
    quiet: bool,
}

fn main() -> Result<()> {
    let args = parse_args();
    logging::init_stderr();

    if args.directories.is_empty() {
        eprintln!("Error: at least one directory is required");
        print_help();
        std::process::exit(1);
    }

    let config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let db = Database::open(config.db_path())?;
    db.initialize()?;
    let db = db.into_shared();
    info!(path = %config.db_path().display(), "Database opened");

    let scanner = Scanner::new(&config.scanner);
    let mut failures = 0;

    for raw in &args.directories {
        let outcome = validate_album_dir(raw)
            .map_err(anyhow::Error::from)
            .and_then(|dir| {
                import_album(&db, &scanner, &dir, &mut |event| {
                    report_progress(&event, args.quiet)
                })
            });

        match outcome {
            Ok(summary) => println!(
                "{}: {} photos (album {})",
                summary.album_name, summary.photos_scanned, summary.album_id
            ),
            Err(e) => {
                error!(directory = %raw, error = ?e, "Import failed");
                eprintln!("{raw}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn report_progress(event: &ScanProgress, quiet: bool) {
    match event {
        ScanProgress::Started { total_files } => info!(total_files, "Scan started"),
        ScanProgress::Scanning { current, total, path } if !quiet => {
            eprintln!("[{current}/{total}] {path}");
        }
        ScanProgress::Scanning { .. } => {}
        ScanProgress::Completed { scanned } => info!(scanned, "Scan completed"),
    }
}

fn parse_args() -> ScanArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = ScanArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--quiet" | "-q" => {
                parsed.quiet = true;
            }
            "--version" | "-V" => {
                println!("dayalbum-scan {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => {
                eprintln!("Unknown argument: {flag}");
                print_help();
                std::process::exit(1);
            }
            dir => parsed.directories.push(dir.to_string()),
        }
        i += 1;
    }

    parsed
}

fn print_help() {
    println!(
        r#"dayalbum-scan - Import photo directories into the dayalbum catalog

USAGE:
    dayalbum-scan [OPTIONS] DIR [DIR...]

OPTIONS:
    --config, -c PATH   Path to config file
    --quiet, -q         Do not print per-file progress
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    DAYALBUM_CONFIG     Path to config file (overrides default location)
    DAYALBUM_DB         Database path
    DAYALBUM_LOG        Log filter (trace, debug, info, warn, error)

Top-level images get no day label; images in subfolders are labelled
with the subfolder path. Re-importing a directory replaces its photos."#
    );
}
