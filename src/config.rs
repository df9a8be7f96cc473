//! Application configuration management.
//!
//! Settings are read from `config.json` in the platform config directory
//! (e.g. `~/.config/dupfinder/config.json` on Linux). Every field is
//! optional; missing fields take their defaults. Command-line flags override
//! file values.
//!
//! ```json
//! {
//!   "algorithm": "sha256",
//!   "chunk_size": 65536,
//!   "follow_symlinks": false,
//!   "io_threads": 1,
//!   "report_path": "duplicate_files.txt"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::duplicates::FinderConfig;
use crate::output::DEFAULT_REPORT_FILE;
use crate::scanner::{HashAlgorithm, Hasher, WalkerConfig, DEFAULT_CHUNK_SIZE};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fingerprint hash algorithm.
    pub algorithm: HashAlgorithm,
    /// Read chunk size in bytes.
    pub chunk_size: usize,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Fingerprinting threads (1 = sequential).
    pub io_threads: usize,
    /// Where the text report is written.
    pub report_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            follow_symlinks: false,
            io_threads: 1,
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Any problem (no config dir, unreadable or invalid file) falls back to
    /// defaults.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No config directory, using defaults: {}", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupfinder", "dupfinder")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Fingerprinter described by this configuration.
    #[must_use]
    pub fn hasher(&self) -> Hasher {
        Hasher::new()
            .with_algorithm(self.algorithm)
            .with_chunk_size(self.chunk_size)
    }

    /// Finder settings described by this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_hasher(self.hasher())
            .with_walker_config(WalkerConfig::new(self.follow_symlinks))
            .with_io_threads(self.io_threads)
    }
}
