//! Elasticsearch sink error types

use thiserror::Error;

/// Errors that can fail a bulk flush
///
/// None of these are fatal: a failed batch is reported through the error
/// drain and dropped, and ingestion continues.
#[derive(Debug, Error)]
pub enum EsSinkError {
    /// The node table is empty; nowhere to write
    #[error("no elasticsearch nodes available")]
    NoNodes,

    /// A document could not be serialized to JSON
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport-level failure talking to the cluster
    #[error("bulk request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The cluster answered with a non-success status
    #[error("bulk request to {node} returned status {status}")]
    Status {
        /// Endpoint that rejected the request
        node: String,
        /// HTTP status code
        status: u16,
    },

    /// The bulk call succeeded but individual actions were rejected
    #[error("bulk response reported item-level failures")]
    ItemsFailed,
}
