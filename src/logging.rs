//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from `SHELLAC_LOG` (e.g. "debug", "shellac=trace").
//! Without it the level is `warn`, or `debug` with `--verbose`.
//!
//! Logs go to stderr so stdout carries only command output.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SHELLAC_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}
