//! Listener configuration
//!
//! Controls the forward-protocol TCP listener.

use std::time::Duration;

use serde::Deserialize;

/// Forward-protocol listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface and port to listen on for client connections
    pub listen: String,

    /// Idle expiry for client connections; the read deadline is reset
    /// after every decoded record (e.g. "30s", "5m", "1h")
    #[serde(with = "humantime_serde")]
    pub expires: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:24224".into(),
            expires: Duration::from_secs(5 * 60),
        }
    }
}
