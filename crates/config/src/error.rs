//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
///
/// All of these are fatal at startup: a relay with a broken configuration
/// exits non-zero rather than guessing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error - required field missing
    #[error("[{section}] is missing required field '{field}'")]
    MissingField {
        /// Config table name
        section: &'static str,
        /// Missing field name
        field: &'static str,
    },

    /// Validation error - a field holds a value that cannot work
    #[error("[{section}] {field}: {reason}")]
    InvalidValue {
        /// Config table name
        section: &'static str,
        /// Offending field name
        field: &'static str,
        /// Why the value is rejected
        reason: String,
    },
}
