//! Kinesis stream configuration
//!
//! The Kinesis pipeline is optional: the whole `[kinesis]` table can be
//! omitted, in which case only the Elasticsearch path runs.

use serde::Deserialize;

/// Kinesis sink configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KinesisConfig {
    /// AWS access key id
    pub access_key: String,

    /// AWS secret access key
    pub secret_key: String,

    /// AWS region of the stream, e.g. `us-east-1`
    pub region: String,

    /// Target stream name
    pub stream: String,

    /// Bounded queue size between the listener and the batch flusher
    pub queue_size: usize,
}

impl KinesisConfig {
    /// Default queue size when the field is omitted
    pub const DEFAULT_QUEUE_SIZE: usize = 500_000;

    /// Effective queue size (the serde default for usize is 0)
    pub fn effective_queue_size(&self) -> usize {
        if self.queue_size == 0 {
            Self::DEFAULT_QUEUE_SIZE
        } else {
            self.queue_size
        }
    }
}
