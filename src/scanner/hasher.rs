//! Streaming file fingerprinting.
//!
//! # Overview
//!
//! A [`Fingerprint`] is the 256-bit digest of a file's full content. Files are
//! read sequentially in fixed-size chunks and fed to a streaming hash state,
//! so memory use is bounded by the chunk size regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{compute_fingerprint, Hasher, HashAlgorithm};
//! use std::path::Path;
//!
//! let fp = compute_fingerprint(Path::new("Cargo.toml")).unwrap();
//! println!("{fp}");
//!
//! let hasher = Hasher::new()
//!     .with_algorithm(HashAlgorithm::Blake3)
//!     .with_chunk_size(64 * 1024);
//! let fp = hasher.fingerprint(Path::new("Cargo.toml")).unwrap();
//! assert_eq!(fp.to_hex().len(), 64);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::ReadError;

/// Default read chunk size (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Largest accepted read chunk size (64 MiB); one buffer of this size is
/// allocated per file being fingerprinted.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Digest length in bytes for every supported algorithm.
pub const FINGERPRINT_LEN: usize = 32;

/// Content fingerprint of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hexadecimal form (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hexadecimal string.
    ///
    /// Returns `None` on wrong length or non-hex characters.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != FINGERPRINT_LEN * 2 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid fingerprint: '{hex}'")))
    }
}

/// Hash function used to compute fingerprints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3 (256-bit output)
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!("Unknown hash algorithm: '{other}'")),
        }
    }
}

/// Streaming hash state for one file.
enum HashState {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl HashState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(chunk),
            Self::Blake3(h) => {
                h.update(chunk);
            }
        }
    }

    fn finalize(self) -> Fingerprint {
        match self {
            Self::Sha256(h) => {
                let mut out = [0u8; FINGERPRINT_LEN];
                out.copy_from_slice(&h.finalize());
                Fingerprint(out)
            }
            Self::Blake3(h) => Fingerprint(*h.finalize().as_bytes()),
        }
    }
}

/// Configured file fingerprinter.
///
/// Cheap to clone and holds no per-file state, so one instance can be shared
/// across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// SHA-256 with 8 KiB chunks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Select the hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read chunk size, clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Configured chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the fingerprint of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the file cannot be opened or a read fails
    /// partway through. No partial fingerprint is ever produced.
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, ReadError> {
        let file = File::open(path).map_err(|e| ReadError::new(path, e))?;
        self.fingerprint_reader(file)
            .map_err(|e| ReadError::new(path, e))
    }

    /// Fingerprint an arbitrary reader until EOF.
    ///
    /// # Errors
    ///
    /// Propagates the first non-`Interrupted` read error.
    pub fn fingerprint_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Fingerprint> {
        let mut state = HashState::new(self.algorithm);
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buffer[..bytes_read]);
        }

        Ok(state.finalize())
    }
}

/// Fingerprint a file with the default [`Hasher`] (SHA-256, 8 KiB chunks).
///
/// # Errors
///
/// Returns [`ReadError`] carrying the path and the underlying I/O cause.
pub fn compute_fingerprint(path: &Path) -> Result<Fingerprint, ReadError> {
    Hasher::new().fingerprint(path)
}
