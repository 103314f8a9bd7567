//! Kinesis stream sink
//!
//! Drains the stream queue into byte-budgeted batches and ships each one
//! with a single `PutRecords` call. Dispatch is spawned off the poll loop
//! so a slow call never stalls batching.

mod batch;
mod error;
mod sink;

pub use batch::{EncodedRecord, StreamBatch, MAX_BATCH_BYTES};
pub use error::KinesisSinkError;
pub use sink::{KinesisSink, KinesisSinkConfig};

// Test modules - only compiled during testing
#[cfg(test)]
mod batch_test;
