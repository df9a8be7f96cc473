//! Logging setup for the dupfinder binary.
//!
//! Uses the `log` facade with the `env_logger` backend. The level comes
//! from, in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `--verbose` (debug, then trace)
//! 3. Default: info
//!
//! Skipped files are reported at warn level, so they stay visible at the
//! default level and disappear with `--quiet`.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupfinder::logging::init_logging;
//!
//! init_logging(1, false, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

/// Initialize logging once at startup.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - Only show errors (ignored when `RUST_LOG` is set)
/// * `no_color` - Never emit ANSI styles
///
/// # Panics
///
/// Panics if a global logger was already installed.
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) {
    let mut builder = Builder::new();

    let from_env = env::var("RUST_LOG").is_ok();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.write_style(if no_color {
        WriteStyle::Never
    } else {
        WriteStyle::Auto
    });

    if verbose > 0 && cfg!(debug_assertions) {
        builder.format(|buf, record| {
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| {
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                record.level(),
                record.args()
            )
        });
    }

    builder.init();

    log::debug!(
        "Logging initialized at {} (from {})",
        log::max_level(),
        if from_env { "RUST_LOG" } else { "CLI flags" }
    );
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
