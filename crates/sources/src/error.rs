//! Source error types

use thiserror::Error;

/// Errors that can stop the forward source
///
/// Note that per-connection problems (protocol errors, timeouts, socket
/// resets) are *not* represented here: they are logged and end only the
/// connection they occurred on.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to bind the listen address (fatal startup error)
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// A sink queue closed; the pipeline is gone and the source must stop
    #[error("sink queue closed")]
    QueueClosed,
}
