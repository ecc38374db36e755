//! Diagnostic logging for the `brs` binary.
//!
//! Log lines go to stderr so they never mix with search output. The filter is read from
//! `BRS_LOG` using `tracing-subscriber` directive syntax (for example `brs_index=debug`);
//! without it only warnings are shown. Each `-v` raises the level and takes precedence
//! over the environment.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BRS_LOG";

/// Returns the level directive implied by the verbosity count, if any.
pub fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        _ => Some("debug"),
    }
}

/// Builds the log filter from the verbosity count and `BRS_LOG`.
pub fn build_filter(verbose: u8) -> EnvFilter {
    match verbosity_level(verbose) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    }
}

/// Installs the global stderr subscriber.
pub fn init(verbose: u8) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("warning: could not initialize logging: {e}");
    }
}
