//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     { "fingerprint": "2cf24d...", "files": ["/data/x.txt", "/data/y.txt"] }
//!   ],
//!   "skipped": [
//!     { "path": "/data/secret", "reason": "read_error", "message": "Permission denied (os error 13)" }
//!   ],
//!   "summary": {
//!     "algorithm": "sha256",
//!     "roots": 1,
//!     "total_files": 3,
//!     "total_size": 15,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 5,
//!     "skipped": 1,
//!     "scan_duration_ms": 3,
//!     "scanned_at": "2024-05-01T12:00:00Z",
//!     "exit_code": 3,
//!     "exit_code_name": "DF003"
//!   }
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanOutcome};
use crate::error::ExitCode;
use crate::scanner::{HashAlgorithm, SkippedFile};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Content fingerprint as hexadecimal string (64 characters)
    pub fingerprint: String,
    /// Paths in visit order
    pub files: Vec<String>,
}

impl From<DuplicateGroup<'_>> for JsonDuplicateGroup {
    fn from(group: DuplicateGroup<'_>) -> Self {
        Self {
            fingerprint: group.fingerprint.to_hex(),
            files: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// A skipped entry in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSkippedFile {
    /// Path of the skipped entry
    pub path: String,
    /// Category (`read_error`, `traversal_error`, `not_regular_file`, `symlink`)
    pub reason: String,
    /// Human-readable cause
    pub message: String,
}

impl From<&SkippedFile> for JsonSkippedFile {
    fn from(skip: &SkippedFile) -> Self {
        Self {
            path: skip.path.to_string_lossy().into_owned(),
            reason: skip.reason.kind().to_string(),
            message: skip.reason.cause(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Hash algorithm used for fingerprints
    pub algorithm: HashAlgorithm,
    /// Number of roots walked
    pub roots: usize,
    /// Number of files fingerprinted
    pub total_files: usize,
    /// Total size of fingerprinted files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Number of duplicate copies (excluding the first of each group)
    pub duplicate_files: usize,
    /// Bytes held by duplicate copies
    pub reclaimable_space: u64,
    /// Number of skipped entries
    pub skipped: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// When the report was produced
    pub scanned_at: DateTime<Utc>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups (two or more files each)
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Entries left out of the index
    pub skipped: Vec<JsonSkippedFile>,
    /// Scan statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a finished scan.
    #[must_use]
    pub fn new(outcome: &ScanOutcome, algorithm: HashAlgorithm, exit_code: ExitCode) -> Self {
        let summary = &outcome.summary;
        Self {
            duplicates: outcome
                .index
                .duplicate_groups()
                .map(JsonDuplicateGroup::from)
                .collect(),
            skipped: outcome.skipped.iter().map(JsonSkippedFile::from).collect(),
            summary: JsonSummary {
                algorithm,
                roots: summary.roots,
                total_files: summary.total_files,
                total_size: summary.total_size,
                duplicate_groups: summary.duplicate_groups,
                duplicate_files: summary.duplicate_files,
                reclaimable_space: summary.reclaimable_space,
                skipped: summary.skipped,
                scan_duration_ms: u64::try_from(summary.scan_duration.as_millis())
                    .unwrap_or(u64::MAX),
                scanned_at: Utc::now(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)
    }
}
