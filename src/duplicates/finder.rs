//! Duplicate scanner: walk, fingerprint, group.
//!
//! # Overview
//!
//! [`DuplicateFinder::scan`] consumes a validated [`ScanRequest`] and walks
//! each root in order. Every regular file is fingerprinted and recorded in a
//! [`DuplicateIndex`] owned by that one scan. Anything that cannot be
//! fingerprinted becomes a [`SkippedFile`]; no single entry can abort the
//! scan. The only fatal condition is a request with no valid roots.
//!
//! With `io_threads > 1` the walk is collected first and fingerprints are
//! computed on a dedicated rayon pool. Results are gathered in walk order and
//! recorded by one writer, so the index is identical to the sequential one.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::duplicates::{DuplicateFinder, FinderConfig, ScanRequest};
//!
//! let (request, invalid) = ScanRequest::new(["/data/photos", "/backup/photos"]);
//! for err in &invalid {
//!     eprintln!("Ignoring {err}");
//! }
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let outcome = finder.scan(request).unwrap();
//! for group in outcome.index.duplicate_groups() {
//!     println!("{}: {:?}", group.fingerprint, group.paths);
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::DuplicateIndex;
use crate::progress::ProgressCallback;
use crate::scanner::{
    validate_root, FileEntry, Fingerprint, Hasher, InvalidRootError, SkippedFile, Walker,
    WalkerConfig,
};

/// A validated, non-duplicated list of root directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    roots: Vec<PathBuf>,
}

impl ScanRequest {
    /// Validate caller-supplied roots.
    ///
    /// Roots that are not existing directories are left out and returned
    /// alongside the request. Repeated roots are kept once, in first-given
    /// order.
    pub fn new<I, P>(roots: I) -> (Self, Vec<InvalidRootError>)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut valid: Vec<PathBuf> = Vec::new();
        let mut invalid = Vec::new();

        for root in roots {
            let root = root.into();
            match validate_root(&root) {
                Ok(()) => {
                    if valid.contains(&root) {
                        log::debug!("Ignoring repeated root: {}", root.display());
                    } else {
                        valid.push(root);
                    }
                }
                Err(e) => {
                    log::debug!("Rejected root: {}", e);
                    invalid.push(e);
                }
            }
        }

        (Self { roots: valid }, invalid)
    }

    /// Split a comma-separated list of directories and validate each.
    ///
    /// Entries are trimmed; blank entries are ignored.
    pub fn parse_list(input: &str) -> (Self, Vec<InvalidRootError>) {
        Self::new(
            input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Validated roots in scan order.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// True when no root survived validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Fingerprinting settings (algorithm, chunk size).
    pub hasher: Hasher,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Number of threads used for fingerprinting. 1 means strictly
    /// sequential walk-and-hash.
    pub io_threads: usize,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("hasher", &self.hasher)
            .field("walker_config", &self.walker_config)
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            hasher: Hasher::new(),
            walker_config: WalkerConfig::default(),
            io_threads: 1,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the fingerprinting settings.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the fingerprinting thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of roots walked
    pub roots: usize,
    /// Number of files fingerprinted
    pub total_files: usize,
    /// Total size of fingerprinted files in bytes
    pub total_size: u64,
    /// Number of fingerprints shared by two or more files
    pub duplicate_groups: usize,
    /// Number of duplicate copies (excluding the first file of each group)
    pub duplicate_files: usize,
    /// Bytes held by duplicate copies
    pub reclaimable_space: u64,
    /// Number of skipped entries
    pub skipped: usize,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Everything one scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Fingerprint → paths
    pub index: DuplicateIndex,
    /// Entries left out of the index, in visit order
    pub skipped: Vec<SkippedFile>,
    /// Counters for reporting
    pub summary: ScanSummary,
}

/// Errors that end a scan before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// Every supplied root was rejected, or none was given.
    #[error("Invalid directories: no valid directory to scan")]
    NoValidRoots,

    /// The fingerprinting thread pool could not be created.
    #[error("Failed to create hashing thread pool: {0}")]
    ThreadPool(String),
}

/// Accumulator owned by a single scan.
struct ScanState<'a> {
    index: DuplicateIndex,
    skipped: Vec<SkippedFile>,
    summary: ScanSummary,
    visited: HashSet<PathBuf>,
    progress: Option<&'a Arc<dyn ProgressCallback>>,
}

impl<'a> ScanState<'a> {
    fn new(progress: Option<&'a Arc<dyn ProgressCallback>>) -> Self {
        Self {
            index: DuplicateIndex::new(),
            skipped: Vec::new(),
            summary: ScanSummary::default(),
            visited: HashSet::new(),
            progress,
        }
    }

    /// True the first time a file is reached. Nested or differently spelled
    /// roots lead back to the same file, so identity is the canonical path.
    fn first_visit(&mut self, path: &Path) -> bool {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.visited.insert(key) {
            true
        } else {
            log::debug!("Already visited: {}", path.display());
            false
        }
    }

    fn record_file(&mut self, file: FileEntry, fingerprint: Fingerprint) {
        log::trace!("{} {}", fingerprint, file.path.display());

        self.summary.total_files += 1;
        self.summary.total_size += file.size;

        if let Some(callback) = self.progress {
            callback.on_progress(
                self.summary.total_files,
                file.path.to_string_lossy().as_ref(),
            );
        }

        if self.index.insert(fingerprint, file.path) {
            self.summary.duplicate_files += 1;
            self.summary.reclaimable_space += file.size;
        }
    }

    fn record_skip(&mut self, skip: SkippedFile) {
        log::warn!("Skipping {}", skip);
        if let Some(callback) = self.progress {
            callback.on_skip(skip.path.to_string_lossy().as_ref());
        }
        self.skipped.push(skip);
    }

    fn finish(mut self, roots: usize, started: Instant) -> ScanOutcome {
        self.summary.roots = roots;
        self.summary.duplicate_groups = self.index.duplicate_group_count();
        self.summary.skipped = self.skipped.len();
        self.summary.scan_duration = started.elapsed();
        ScanOutcome {
            index: self.index,
            skipped: self.skipped,
            summary: self.summary,
        }
    }
}

/// Duplicate scanner over a set of roots.
///
/// # Example
///
/// ```no_run
/// use dupfinder::duplicates::{DuplicateFinder, ScanRequest};
///
/// let (request, _) = ScanRequest::new(["."]);
/// let outcome = DuplicateFinder::with_defaults().scan(request).unwrap();
/// println!("Found {} duplicate groups", outcome.summary.duplicate_groups);
/// println!("Reclaimable space: {}", outcome.summary.reclaimable_display());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Scan every root in `request` and group files by fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NoValidRoots`] if the request is empty (the
    /// scan does not run), or [`FinderError::ThreadPool`] if a parallel pool
    /// was requested and could not be built. Per-file problems are never
    /// errors; they are returned in [`ScanOutcome::skipped`].
    pub fn scan(&self, request: ScanRequest) -> Result<ScanOutcome, FinderError> {
        if request.is_empty() {
            log::warn!("No valid directories to scan");
            return Err(FinderError::NoValidRoots);
        }

        let started = Instant::now();
        log::info!(
            "Scanning {} director{} ({}, {} byte chunks)",
            request.roots().len(),
            if request.roots().len() == 1 { "y" } else { "ies" },
            self.config.hasher.algorithm(),
            self.config.hasher.chunk_size()
        );

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("Scanning", 0);
        }

        let mut state = ScanState::new(self.config.progress_callback.as_ref());
        let result = if self.config.io_threads > 1 {
            self.scan_parallel(request.roots(), &mut state)
        } else {
            self.scan_sequential(request.roots(), &mut state);
            Ok(())
        };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("Scanning");
        }
        result?;

        let outcome = state.finish(request.roots().len(), started);
        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} skipped in {:.2?}",
            outcome.summary.total_files,
            outcome.summary.duplicate_groups,
            outcome.summary.skipped,
            outcome.summary.scan_duration
        );
        Ok(outcome)
    }

    /// Walk and fingerprint one file at a time.
    fn scan_sequential(&self, roots: &[PathBuf], state: &mut ScanState<'_>) {
        for root in roots {
            log::debug!("Walking {}", root.display());
            for entry in self.walker(root).walk() {
                match entry {
                    Ok(file) if !state.first_visit(&file.path) => {}
                    Ok(file) => match self.config.hasher.fingerprint(&file.path) {
                        Ok(fingerprint) => state.record_file(file, fingerprint),
                        Err(e) => state.record_skip(e.into()),
                    },
                    Err(skip) => state.record_skip(skip),
                }
            }
        }
    }

    /// Collect the walk, fingerprint on a pool, record in walk order.
    fn scan_parallel(
        &self,
        roots: &[PathBuf],
        state: &mut ScanState<'_>,
    ) -> Result<(), FinderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
            .map_err(|e| FinderError::ThreadPool(e.to_string()))?;

        let mut entries: Vec<Result<FileEntry, SkippedFile>> = roots
            .iter()
            .flat_map(|root| {
                log::debug!("Walking {}", root.display());
                self.walker(root).walk().collect::<Vec<_>>()
            })
            .collect();
        entries.retain(|entry| match entry {
            Ok(file) => state.first_visit(&file.path),
            Err(_) => true,
        });

        log::debug!(
            "Fingerprinting {} entries on {} threads",
            entries.len(),
            self.config.io_threads
        );

        let hasher = self.config.hasher;
        let hashed: Vec<Result<(FileEntry, Fingerprint), SkippedFile>> = pool.install(|| {
            entries
                .into_par_iter()
                .map(|entry| {
                    let file = entry?;
                    match hasher.fingerprint(&file.path) {
                        Ok(fingerprint) => Ok((file, fingerprint)),
                        Err(e) => Err(SkippedFile::from(e)),
                    }
                })
                .collect()
        });

        for result in hashed {
            match result {
                Ok((file, fingerprint)) => state.record_file(file, fingerprint),
                Err(skip) => state.record_skip(skip),
            }
        }
        Ok(())
    }

    fn walker(&self, root: &Path) -> Walker {
        Walker::new(root, self.config.walker_config.clone())
    }
}

/// Validate `roots` and scan them with default settings.
///
/// Invalid roots are logged and dropped. Returns the index and the skip
/// report.
///
/// # Errors
///
/// Returns [`FinderError::NoValidRoots`] if no root is a directory.
///
/// # Example
///
/// ```no_run
/// use dupfinder::duplicates::scan_for_duplicates;
///
/// let (index, skipped) = scan_for_duplicates(["./a", "./b"]).unwrap();
/// for group in index.duplicate_groups() {
///     println!("{:?}", group.paths);
/// }
/// for skip in &skipped {
///     eprintln!("Skipped {skip}");
/// }
/// ```
pub fn scan_for_duplicates<I, P>(
    roots: I,
) -> Result<(DuplicateIndex, Vec<SkippedFile>), FinderError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let (request, invalid) = ScanRequest::new(roots);
    for err in &invalid {
        log::warn!("Ignoring root: {}", err);
    }
    let outcome = DuplicateFinder::with_defaults().scan(request)?;
    Ok((outcome.index, outcome.skipped))
}
