//! Fingerprint-to-paths index produced by a scan.
//!
//! # Overview
//!
//! [`DuplicateIndex`] maps each [`Fingerprint`] to the paths that share it.
//! Paths inside an entry keep the order in which the scan visited them, and
//! entries themselves keep first-seen order, so a deterministic walk renders
//! deterministically. An entry with one path is a unique file; two or more
//! paths form a [`DuplicateGroup`].
//!
//! The index is built by a single scan and handed out as an immutable value.
//! Outside the crate it can only be constructed whole, via [`FromIterator`].
//!
//! # Example
//!
//! ```
//! use dupfinder::duplicates::DuplicateIndex;
//! use dupfinder::scanner::Fingerprint;
//! use std::path::PathBuf;
//!
//! let a = Fingerprint::from_bytes([1; 32]);
//! let b = Fingerprint::from_bytes([2; 32]);
//! let index: DuplicateIndex = vec![
//!     (a, PathBuf::from("x.txt")),
//!     (a, PathBuf::from("y.txt")),
//!     (b, PathBuf::from("z.txt")),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.duplicate_groups().count(), 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::Fingerprint;

/// Mapping from fingerprint to the paths sharing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateIndex {
    entries: Vec<(Fingerprint, Vec<PathBuf>)>,
    positions: HashMap<Fingerprint, usize>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `fingerprint`.
    ///
    /// Returns `true` if the fingerprint was already present, i.e. the path
    /// is a duplicate of an earlier one.
    pub(crate) fn insert(&mut self, fingerprint: Fingerprint, path: PathBuf) -> bool {
        match self.positions.get(&fingerprint) {
            Some(&pos) => {
                self.entries[pos].1.push(path);
                true
            }
            None => {
                self.positions.insert(fingerprint, self.entries.len());
                self.entries.push((fingerprint, vec![path]));
                false
            }
        }
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no file was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of indexed paths.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().map(|(_, paths)| paths.len()).sum()
    }

    /// Paths recorded for `fingerprint`, in visit order.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[PathBuf]> {
        self.positions
            .get(fingerprint)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Fingerprint recorded for `path`, if it was indexed.
    #[must_use]
    pub fn fingerprint_of(&self, path: &Path) -> Option<Fingerprint> {
        self.entries
            .iter()
            .find(|(_, paths)| paths.iter().any(|p| p == path))
            .map(|(fp, _)| *fp)
    }

    /// All entries (unique files included) in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[PathBuf])> {
        self.entries.iter().map(|(fp, paths)| (fp, paths.as_slice()))
    }

    /// Entries with two or more paths.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = DuplicateGroup<'_>> {
        self.entries
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(fp, paths)| DuplicateGroup {
                fingerprint: *fp,
                paths,
            })
    }

    /// Number of duplicate groups.
    #[must_use]
    pub fn duplicate_group_count(&self) -> usize {
        self.duplicate_groups().count()
    }

    /// True when at least one duplicate group exists.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.entries.iter().any(|(_, paths)| paths.len() > 1)
    }

    /// Convert into a plain map, dropping entry order.
    #[must_use]
    pub fn into_map(self) -> HashMap<Fingerprint, Vec<PathBuf>> {
        self.entries.into_iter().collect()
    }
}

impl FromIterator<(Fingerprint, PathBuf)> for DuplicateIndex {
    fn from_iter<I: IntoIterator<Item = (Fingerprint, PathBuf)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (fingerprint, path) in iter {
            index.insert(fingerprint, path);
        }
        index
    }
}

/// Two or more paths sharing one fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    /// Shared content fingerprint
    pub fingerprint: Fingerprint,
    /// Paths in visit order
    pub paths: &'a [PathBuf],
}

impl DuplicateGroup<'_> {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for groups produced by an index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}
