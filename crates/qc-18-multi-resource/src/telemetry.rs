//! Log subscriber setup.
//!
//! Embedders that already install a global subscriber can skip this; the
//! service only emits through `tracing` macros.

use crate::config::MultiResourceConfig;
use crate::errors::ConfigError;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `config.log_level`.
///
/// `RUST_LOG` directives take precedence when set. Returns `Ok(false)` if a
/// global subscriber was already installed.
///
/// # Errors
///
/// `InvalidValue` if the log level is not a valid filter directive.
pub fn init_logging(config: &MultiResourceConfig) -> Result<bool, ConfigError> {
    let filter = build_filter(&config.log_level)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(log_level = %config.log_level, "Logging initialized");
    }
    Ok(installed)
}

fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|_| ConfigError::InvalidValue {
            key: "QC_LOG_LEVEL",
            value: level.to_string(),
        })
}
