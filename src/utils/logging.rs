//! Structured logging bootstrap.
//!
//! Library code only emits `tracing` events; binaries call [`init_logging`] once
//! to install a subscriber. `RUST_LOG` takes precedence over the configured level.

use crate::config::LoggingConfig;
use crate::error::{IoError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber according to `config`.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if !config.log_to_console {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| IoError::ConfigError(format!("Failed to install logger: {e}")))?;
    tracing::debug!(app = %config.app_name, "Logging initialized");
    Ok(())
}
