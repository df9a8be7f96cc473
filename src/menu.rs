//! Interactive text menu.
//!
//! ```text
//! —— File Duplicate Finder ——
//! 1. Enter directories to search
//! 2. Exit
//! Choose an option:
//! ```
//!
//! Option `1` asks for a comma-separated list of directories, scans the ones
//! that exist, saves the report and prints it. End of input exits like `2`.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::duplicates::{DuplicateFinder, ScanRequest};
use crate::output::TextOutput;

const TITLE: &str = "—— File Duplicate Finder ——";

/// Run the menu loop until the user exits or input ends.
///
/// Skipped entries are printed as `Skipping <path>: <cause>` before the
/// results.
///
/// # Errors
///
/// Returns an error if reading input, writing output or saving the report
/// fails.
pub fn run_menu<R, W>(
    mut input: R,
    mut output: W,
    finder: &DuplicateFinder,
    report_path: &Path,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "\n{TITLE}")?;
        writeln!(output, "1. Enter directories to search")?;
        writeln!(output, "2. Exit")?;

        let Some(choice) = prompt(&mut input, &mut output, "Choose an option: ")? else {
            break;
        };

        match choice.trim() {
            "1" => {
                let Some(line) =
                    prompt(&mut input, &mut output, "Enter directories separated by commas: ")?
                else {
                    break;
                };
                run_scan(&line, &mut output, finder, report_path)?;
            }
            "2" => {
                writeln!(output, "Exiting...")?;
                break;
            }
            _ => writeln!(output, "Invalid choice. Try again.")?,
        }
    }

    output.flush()?;
    Ok(())
}

/// Print `message`, then read one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read input")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn run_scan<W: Write>(
    line: &str,
    output: &mut W,
    finder: &DuplicateFinder,
    report_path: &Path,
) -> Result<()> {
    let (request, rejected) = ScanRequest::parse_list(line);
    for err in &rejected {
        log::debug!("{}", err);
    }
    if request.is_empty() {
        writeln!(output, "Invalid directories. Please try again.")?;
        return Ok(());
    }

    let outcome = finder.scan(request)?;
    for skip in &outcome.skipped {
        writeln!(output, "Skipping {skip}")?;
    }

    let report = TextOutput::new(&outcome.index);
    report
        .save(report_path)
        .with_context(|| format!("Failed to save results to {}", report_path.display()))?;
    writeln!(output, "\nResults saved to '{}'.", report_path.display())?;

    writeln!(output)?;
    report.write_to(&mut *output)?;
    Ok(())
}
