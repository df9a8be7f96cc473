//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each file that belongs to a duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number, in report order
//! - `fingerprint`: content fingerprint (hexadecimal)
//! - `path`: file path as visited

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateIndex;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    fingerprint: &'a str,
    path: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    index: &'a DuplicateIndex,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(index: &'a DuplicateIndex) -> Self {
        Self { index }
    }

    /// Write the CSV output to the given writer.
    ///
    /// A header row is always written, even when there are no duplicates.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(["group_id", "fingerprint", "path"])?;

        for (idx, group) in self.index.duplicate_groups().enumerate() {
            let fingerprint = group.fingerprint.to_hex();
            for path in group.paths {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    fingerprint: &fingerprint,
                    path: path.to_string_lossy().into_owned(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
