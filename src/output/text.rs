//! Plain-text duplicate report.
//!
//! This is both the console rendering and the persisted results file:
//!
//! ```text
//! —— Duplicate Files Found ——
//!
//! Duplicate Group:
//!  - /data/a.txt
//!  - /data/copy-of-a.txt
//! ```
//!
//! When no fingerprint has two or more paths, the heading is followed by a
//! single `No duplicate files found.` line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use yansi::Paint;

use crate::duplicates::DuplicateIndex;

/// First line of every report.
pub const REPORT_HEADING: &str = "—— Duplicate Files Found ——";

/// Header line of each group section.
pub const GROUP_HEADING: &str = "Duplicate Group:";

/// Line written when no group has two or more files.
pub const NO_DUPLICATES: &str = "No duplicate files found.";

/// Default report file name.
pub const DEFAULT_REPORT_FILE: &str = "duplicate_files.txt";

/// Text report formatter.
pub struct TextOutput<'a> {
    index: &'a DuplicateIndex,
    colored: bool,
}

impl<'a> TextOutput<'a> {
    /// Create an uncolored formatter.
    #[must_use]
    pub fn new(index: &'a DuplicateIndex) -> Self {
        Self {
            index,
            colored: false,
        }
    }

    /// Enable or disable ANSI colors (console only; never for files).
    #[must_use]
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Write the report to `writer`.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.colored {
            writeln!(writer, "{}", REPORT_HEADING.bold())?;
        } else {
            writeln!(writer, "{REPORT_HEADING}")?;
        }

        let mut found = false;
        for group in self.index.duplicate_groups() {
            found = true;
            writeln!(writer)?;
            if self.colored {
                writeln!(writer, "{}", GROUP_HEADING.yellow().bold())?;
            } else {
                writeln!(writer, "{GROUP_HEADING}")?;
            }
            for path in group.paths {
                writeln!(writer, " - {}", path.display())?;
            }
        }

        if !found {
            if self.colored {
                writeln!(writer, "{}", NO_DUPLICATES.green())?;
            } else {
                writeln!(writer, "{NO_DUPLICATES}")?;
            }
        }

        writer.flush()
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the uncolored report to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let plain = TextOutput {
            index: self.index,
            colored: false,
        };
        plain.write_to(BufWriter::new(file))
    }
}
