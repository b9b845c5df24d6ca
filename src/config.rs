//! # Configuration Management
//!
//! Centralized configuration for the binary I/O library.
//!
//! Covers connection buffer sizing and logging output. The core sinks, sources,
//! readers and writers take no configuration; everything here concerns the
//! components that own long-lived buffers or bootstrap the process.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`BINARY_IO_*` variables)

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Initial send buffer capacity per connection (bytes)
pub const DEFAULT_SEND_CAPACITY: usize = 4 * 1024;

/// Initial receive buffer capacity per connection (bytes)
pub const DEFAULT_RECEIVE_CAPACITY: usize = 4 * 1024;

/// Upper bound for one outgoing message (e.g. 16 MB)
pub const MAX_SEND_BUFFER: usize = 16 * 1024 * 1024;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct IoConfig {
    /// Connection buffer configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IoConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| IoError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| IoError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| IoError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("BINARY_IO_SEND_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.connection.initial_send_capacity = val;
            }
        }

        if let Ok(capacity) = std::env::var("BINARY_IO_RECEIVE_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.connection.initial_receive_capacity = val;
            }
        }

        if let Ok(limit) = std::env::var("BINARY_IO_MAX_SEND_BUFFER") {
            if let Ok(val) = limit.parse::<usize>() {
                config.connection.max_send_buffer = val;
            }
        }

        if let Ok(level) = std::env::var("BINARY_IO_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| IoError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| IoError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.connection.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Connection buffer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Send buffer capacity allocated up front
    pub initial_send_capacity: usize,

    /// Receive buffer capacity allocated up front
    pub initial_receive_capacity: usize,

    /// Largest message the send buffer may grow to; writes beyond it fail
    pub max_send_buffer: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            initial_send_capacity: DEFAULT_SEND_CAPACITY,
            initial_receive_capacity: DEFAULT_RECEIVE_CAPACITY,
            max_send_buffer: MAX_SEND_BUFFER,
        }
    }
}

impl ConnectionConfig {
    /// Validate connection configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_send_buffer == 0 {
            errors.push("Max send buffer cannot be 0".to_string());
        } else if self.max_send_buffer > 256 * 1024 * 1024 {
            errors.push(format!(
                "Max send buffer too large: {} bytes (maximum recommended: 256 MB)",
                self.max_send_buffer
            ));
        }

        if self.initial_send_capacity > self.max_send_buffer {
            errors.push("Initial send capacity cannot exceed max send buffer".to_string());
        }

        if self.initial_receive_capacity > 64 * 1024 * 1024 {
            errors.push(format!(
                "Initial receive capacity too large: {} bytes (maximum: 64 MB)",
                self.initial_receive_capacity
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("binary-io"),
            log_level: Level::INFO,
            log_to_console: true,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
