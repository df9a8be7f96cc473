//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! [`Walker`] enumerates every regular file below a root directory in a
//! deterministic order (children sorted by file name, depth-first). Entries
//! that are not regular files, and entries that cannot be read, are yielded
//! as [`SkippedFile`] values rather than ending the walk.
//!
//! # Symlinks
//!
//! By default links are not followed and each one is reported as a skip.
//! With [`WalkerConfig::follow_symlinks`] set, walkdir resolves links and
//! detects cycles against the ancestor chain; a cycle is reported as a
//! [`TraversalError::Loop`] skip and the walk continues.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, SkipReason, SkippedFile, TraversalError, WalkerConfig};

/// Recursive file discovery below one root.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupfinder::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding regular files and skips in visit
    /// order.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, SkippedFile>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.classify(entry),
                Err(e) => {
                    let error = TraversalError::from_walkdir(e, &self.root);
                    log::debug!("Walk error: {}", error);
                    Some(Err(SkippedFile::from(error)))
                }
            })
    }

    /// Turn one walk entry into a file, a skip, or nothing (directories).
    fn classify(&self, entry: DirEntry) -> Option<Result<FileEntry, SkippedFile>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            log::trace!("Entering directory: {}", entry.path().display());
            return None;
        }

        // With follow_links enabled walkdir reports the target's type, so a
        // symlink here is always one we chose not to follow.
        if file_type.is_symlink() {
            log::debug!("Skipping symlink: {}", entry.path().display());
            return Some(Err(SkippedFile::new(
                entry.into_path(),
                SkipReason::SymlinkNotFollowed,
            )));
        }

        if !file_type.is_file() {
            log::debug!("Skipping special file: {}", entry.path().display());
            return Some(Err(SkippedFile::new(
                entry.into_path(),
                SkipReason::NotRegularFile,
            )));
        }

        match entry.metadata() {
            Ok(metadata) => Some(Ok(FileEntry::new(entry.into_path(), metadata.len()))),
            Err(e) => {
                let error = TraversalError::from_walkdir(e, entry.path());
                log::debug!("Metadata error: {}", error);
                Some(Err(SkippedFile::from(error)))
            }
        }
    }
}
