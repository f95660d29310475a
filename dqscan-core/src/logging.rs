//! Logging setup shared by the dqscan binary and tests.

use tracing_subscriber::EnvFilter;

use crate::Result;

/// Maps CLI verbosity flags to a tracing level.
///
/// `quiet` wins over any verbosity; otherwise 0=INFO, 1=DEBUG, 2+=TRACE.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Builds the level filter: `RUST_LOG` when set and valid, otherwise the
/// level from the CLI flags.
pub fn env_filter(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet).as_str()))
}

/// Initializes structured logging to stderr.
///
/// Logs go to stderr so that rendered tables on stdout stay clean.
/// `RUST_LOG` overrides the verbosity flags.
///
/// # Example
/// ```rust,no_run
/// use dqscan_core::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            crate::error::DqError::configuration(format!("Failed to initialize logging: {}", e))
        })?;

    Ok(())
}
