// file: src/logging/logger.rs
// version: 1.1.0
// guid: 63b98ad5-d6ee-44bc-a234-e43939f944f4

//! Logger initialization and configuration

use crate::error::PiInfoError;
use crate::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter directive for the command line flags.
///
/// `RUST_LOG` wins when it is set, then `--quiet`, then `--verbose`,
/// then the configured level.
pub fn filter_directive(verbose: bool, quiet: bool, configured: &str) -> String {
    if let Ok(directive) = std::env::var(EnvFilter::DEFAULT_ENV) {
        if !directive.trim().is_empty() {
            return directive;
        }
    }

    if quiet {
        "error".to_string()
    } else if verbose {
        "debug".to_string()
    } else {
        configured.to_string()
    }
}

fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| PiInfoError::logging(format!("Invalid log filter {:?}: {}", directive, e)))
}

/// Initialize the logging system
pub fn init_logger(verbose: bool, quiet: bool, level: &str) -> Result<()> {
    let filter = build_filter(&filter_directive(verbose, quiet, level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| PiInfoError::logging(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Initialize structured JSON logging (for services)
pub fn init_json_logger(verbose: bool, quiet: bool, level: &str) -> Result<()> {
    let filter = build_filter(&filter_directive(verbose, quiet, level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| PiInfoError::logging(format!("Failed to initialize JSON logger: {}", e)))?;

    Ok(())
}
