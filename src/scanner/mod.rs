//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Sorted, recursive directory walking using walkdir
//! - Streaming content fingerprints (SHA-256 or BLAKE3)
//! - Per-entry skip records for anything that cannot be fingerprinted
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Chunked file fingerprinting
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(skip) => eprintln!("Skipping {skip}"),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{
    compute_fingerprint, Fingerprint, HashAlgorithm, Hasher, DEFAULT_CHUNK_SIZE, FINGERPRINT_LEN,
    MAX_CHUNK_SIZE,
};
pub use walker::Walker;

/// A regular file discovered during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path as produced by the walk (root joined with relative components)
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    ///
    /// Links that lead back to an ancestor directory are reported as
    /// traversal skips instead of being descended.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }
}

/// A file could not be opened or fully read while fingerprinting.
#[derive(thiserror::Error, Debug)]
#[error("Error reading file {path}: {source}")]
pub struct ReadError {
    /// File that failed
    pub path: PathBuf,
    /// The underlying I/O error
    #[source]
    pub source: io::Error,
}

impl ReadError {
    /// Create a read error for `path`.
    #[must_use]
    pub fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A directory or entry could not be traversed.
#[derive(thiserror::Error, Debug)]
pub enum TraversalError {
    /// Reading a directory or entry metadata failed (permission denied,
    /// broken symlink, entry removed during the walk).
    #[error("Cannot access {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A followed symlink points back to one of its ancestors.
    #[error("Filesystem loop at {path} (points to ancestor {ancestor})")]
    Loop {
        /// The link that closes the cycle
        path: PathBuf,
        /// The ancestor directory it resolves to
        ancestor: PathBuf,
    },
}

impl TraversalError {
    /// Convert a walkdir error, falling back to `root` when the error
    /// carries no path.
    #[must_use]
    pub fn from_walkdir(error: walkdir::Error, root: &Path) -> Self {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            return Self::Loop {
                path,
                ancestor: ancestor.to_path_buf(),
            };
        }

        let message = error.to_string();
        let source = error
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(message));
        Self::Io { path, source }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Loop { path, .. } => path,
        }
    }
}

/// A caller-supplied root is not an existing directory.
#[derive(thiserror::Error, Debug)]
pub enum InvalidRootError {
    /// The path does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The path's metadata could not be read.
    #[error("Cannot access {path}: {source}")]
    Inaccessible {
        /// Root that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl InvalidRootError {
    /// The rejected root.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::NotADirectory(path) => path,
            Self::Inaccessible { path, .. } => path,
        }
    }
}

/// Check that `path` exists and is a directory (symlinks are resolved).
///
/// # Errors
///
/// Returns the matching [`InvalidRootError`] variant.
pub fn validate_root(path: &Path) -> Result<(), InvalidRootError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(InvalidRootError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(InvalidRootError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(InvalidRootError::Inaccessible {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Why an entry was left out of the duplicate index.
#[derive(thiserror::Error, Debug)]
pub enum SkipReason {
    /// Fingerprinting failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The entry could not be traversed.
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    /// Device, socket, FIFO or other special file.
    #[error("not a regular file")]
    NotRegularFile,

    /// Symbolic link encountered while links are not followed.
    #[error("symbolic link not followed")]
    SymlinkNotFollowed,
}

impl SkipReason {
    /// Short machine-readable category.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read(_) => "read_error",
            Self::Traversal(_) => "traversal_error",
            Self::NotRegularFile => "not_regular_file",
            Self::SymlinkNotFollowed => "symlink",
        }
    }

    /// Cause without the path prefix.
    #[must_use]
    pub fn cause(&self) -> String {
        match self {
            Self::Read(e) => e.source.to_string(),
            Self::Traversal(TraversalError::Io { source, .. }) => source.to_string(),
            Self::Traversal(TraversalError::Loop { ancestor, .. }) => {
                format!("filesystem loop back to {}", ancestor.display())
            }
            other => other.to_string(),
        }
    }
}

/// An entry excluded from results, reported alongside the index.
#[derive(Debug)]
pub struct SkippedFile {
    /// The skipped entry
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: SkipReason,
}

impl SkippedFile {
    /// Create a new skip record.
    #[must_use]
    pub fn new(path: PathBuf, reason: SkipReason) -> Self {
        Self { path, reason }
    }
}

impl From<ReadError> for SkippedFile {
    fn from(error: ReadError) -> Self {
        Self {
            path: error.path.clone(),
            reason: SkipReason::Read(error),
        }
    }
}

impl From<TraversalError> for SkippedFile {
    fn from(error: TraversalError) -> Self {
        Self {
            path: error.path().to_path_buf(),
            reason: SkipReason::Traversal(error),
        }
    }
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason.cause())
    }
}
