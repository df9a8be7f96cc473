//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Root validation ([`ScanRequest`])
//! - Walking and fingerprinting ([`DuplicateFinder`])
//! - The fingerprint-to-paths result ([`DuplicateIndex`])

pub mod finder;
pub mod index;

pub use finder::{
    scan_for_duplicates, DuplicateFinder, FinderConfig, FinderError, ScanOutcome, ScanRequest,
    ScanSummary,
};
pub use index::{DuplicateGroup, DuplicateIndex};
