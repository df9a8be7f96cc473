//! dupfinder - content-based duplicate file finder
//!
//! Walks one or more directory trees, fingerprints every regular file with a
//! streaming cryptographic hash and groups paths that share a fingerprint.
//! Anything that cannot be fingerprinted is recorded as a skip and the scan
//! keeps going.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::{DuplicateFinder, ScanRequest};
//!
//! let (request, _rejected) = ScanRequest::new(["/data/photos", "/mnt/backup"]);
//! let outcome = DuplicateFinder::with_defaults().scan(request).unwrap();
//! for group in outcome.index.duplicate_groups() {
//!     println!("{}: {:?}", group.fingerprint, group.paths);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod menu;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, MenuArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderError, ScanRequest};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the parsed command line, writing results to stdout.
///
/// # Errors
///
/// Returns an error when the run cannot complete: unreadable `--config`,
/// no valid directory, or a failure writing results.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdout = io::stdout();
    let colored = !cli.no_color && stdout.is_terminal();
    run_with_output(cli, stdout.lock(), colored)
}

/// Run the parsed command line, writing results to `out`.
///
/// Text results are colored only when `colored` is set and `--no-color` was
/// not given. Skipped entries are always listed, even with `--quiet`: as
/// `Skipping <path>: <cause>` lines before a text report, on stderr next to
/// CSV, and in the `skipped` array of JSON.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_output<W: Write>(cli: Cli, out: W, colored: bool) -> Result<ExitCode> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let colored = colored && !cli.no_color;

    match cli.command {
        Commands::Scan(ref args) => handle_scan(args, config, cli.quiet, colored, out),
        Commands::Menu(ref args) => handle_menu(args, config, out),
    }
}

fn handle_scan<W: Write>(
    args: &ScanArgs,
    mut config: Config,
    quiet: bool,
    colored: bool,
    mut out: W,
) -> Result<ExitCode> {
    args.apply_to(&mut config);
    log::debug!("Effective configuration: {:?}", config);

    let (request, rejected) = ScanRequest::new(args.paths.iter().cloned());
    for err in &rejected {
        log::warn!("Skipping directory: {}", err);
    }
    if request.is_empty() {
        return Err(FinderError::NoValidRoots.into());
    }

    let mut finder_config = config.finder_config();
    if args.output == OutputFormat::Text && !quiet {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }
    let outcome = DuplicateFinder::new(finder_config).scan(request)?;
    let summary = &outcome.summary;
    let exit_code = ExitCode::for_scan(outcome.index.has_duplicates(), outcome.skipped.len());

    match args.output {
        OutputFormat::Text => {
            for skip in &outcome.skipped {
                writeln!(out, "Skipping {skip}")?;
            }
            writeln!(out)?;
            TextOutput::new(&outcome.index)
                .with_color(colored)
                .write_to(&mut out)?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&outcome, config.algorithm, exit_code).write_to(&mut out)?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&outcome.index).write_to(&mut out)?;
            // Keep stdout parseable; skips go to stderr
            for skip in &outcome.skipped {
                eprintln!("Skipping {skip}");
            }
        }
    }

    if !args.no_report {
        TextOutput::new(&outcome.index)
            .save(&config.report_path)
            .with_context(|| {
                format!("Failed to save results to {}", config.report_path.display())
            })?;
        log::info!("Results saved to '{}'.", config.report_path.display());
    }

    log::info!(
        "Scanned {} files ({}) in {:.2?}: {} duplicate groups, {} reclaimable, {} skipped",
        summary.total_files,
        summary.total_size_display(),
        summary.scan_duration,
        summary.duplicate_groups,
        summary.reclaimable_display(),
        summary.skipped
    );

    Ok(exit_code)
}

fn handle_menu<W: Write>(args: &MenuArgs, config: Config, out: W) -> Result<ExitCode> {
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| config.report_path.clone());
    let finder = DuplicateFinder::new(config.finder_config());

    menu::run_menu(io::stdin().lock(), out, &finder, &report_path)?;
    Ok(ExitCode::Success)
}
