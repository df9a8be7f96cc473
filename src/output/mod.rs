//! Output formatters for duplicate scan results.
//!
//! - Text for the console and the persisted `duplicate_files.txt` report
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::scan_for_duplicates;
//! use dupfinder::output::TextOutput;
//!
//! let (index, _skipped) = scan_for_duplicates(["."]).unwrap();
//! print!("{}", TextOutput::new(&index).render());
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::{TextOutput, DEFAULT_REPORT_FILE};
