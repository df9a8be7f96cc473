//! Command-line interface definitions for dupfinder.
//!
//! # Example
//!
//! ```bash
//! # Scan two directories, print the report and save duplicate_files.txt
//! dupfinder scan ~/Pictures /mnt/backup/Pictures
//!
//! # JSON for scripting, no report file
//! dupfinder scan ~/Downloads --output json --no-report
//!
//! # BLAKE3 with 1 MiB reads on 4 threads
//! dupfinder scan /data --algorithm blake3 --chunk-size 1MiB --io-threads 4
//!
//! # Interactive menu
//! dupfinder menu
//! ```

use std::path::PathBuf;

use bytesize::ByteSize;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::scanner::{HashAlgorithm, MAX_CHUNK_SIZE};

/// Find duplicate files by content.
///
/// dupfinder walks one or more directories, fingerprints every file with a
/// cryptographic hash and reports groups of files with identical content.
#[derive(Debug, Parser)]
#[command(name = "dupfinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from this file instead of the default config location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate files
    Scan(ScanArgs),
    /// Interactive menu: enter directories, view and save results
    Menu(MenuArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan (invalid ones are reported and skipped)
    #[arg(value_name = "DIR", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Output format for the results on stdout
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Where to save the text report
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Do not write a report file
    #[arg(long, conflicts_with = "report")]
    pub no_report: bool,

    /// Hash algorithm for fingerprints (sha256 or blake3)
    #[arg(long, value_name = "ALGO", value_parser = parse_algorithm)]
    pub algorithm: Option<HashAlgorithm>,

    /// Read chunk size (e.g., 8KiB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB
    #[arg(long, value_name = "SIZE", value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,

    /// Follow symbolic links (loops are detected and skipped)
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Number of threads for hashing (1 = sequential)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,
}

impl ScanArgs {
    /// Override file settings with the flags given on the command line.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if let Some(threads) = self.io_threads {
            config.io_threads = threads.max(1);
        }
        if let Some(ref report) = self.report {
            config.report_path = report.clone();
        }
    }
}

/// Arguments for the menu subcommand.
#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Where to save the text report after each scan
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable duplicate report
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

fn parse_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse()
}

/// Parse a human-readable size such as `8192`, `8KiB` or `1.5 MB` into bytes.
///
/// Decimal (KB, MB, GB) and binary (KiB, MiB, GiB) suffixes are accepted in
/// any case; a bare number is a byte count.
///
/// ```
/// use dupfinder::cli::parse_size;
///
/// assert_eq!(parse_size("8KiB").unwrap(), 8192);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns a message for empty, negative or unparsable input.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err(format!("Size cannot be negative: '{s}'"));
    }
    s.parse::<ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| format!("Invalid size '{s}': {e}"))
}

/// Parse a chunk size between one byte and [`MAX_CHUNK_SIZE`].
fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Chunk size must be at least 1 byte".to_string());
    }
    match usize::try_from(bytes) {
        Ok(size) if size <= MAX_CHUNK_SIZE => Ok(size),
        _ => Err(format!(
            "Chunk size {} exceeds the maximum of {}",
            ByteSize::b(bytes),
            ByteSize::b(MAX_CHUNK_SIZE as u64)
        )),
    }
}
