//! Logging configuration
//!
//! Controls the relay's internal logging behavior.

use serde::Deserialize;

/// Minimum severity the relay emits
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-record noise
    Trace,
    /// Connection and flush detail
    Debug,
    /// Normal operation (default)
    #[default]
    Info,
    /// Dropped batches and expired connections
    Warn,
    /// Startup failures only
    Error,
}

impl LogLevel {
    /// The filter directive string the tracing subscriber expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Shape of the log output
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for a terminal (default)
    #[default]
    Console,
    /// One JSON object per line, for log collectors
    Json,
}

/// Logging configuration table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level to emit
    pub level: LogLevel,

    /// Output format
    pub format: LogFormat,
}
