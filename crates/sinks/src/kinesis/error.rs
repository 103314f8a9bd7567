//! Kinesis sink error types

use aws_sdk_kinesis::error::{BuildError, SdkError};
use aws_sdk_kinesis::operation::put_records::PutRecordsError;
use thiserror::Error;

/// Errors that can fail a batch submission
///
/// Like the bulk sink, none of these are fatal: the batch is dropped and
/// polling continues.
#[derive(Debug, Error)]
pub enum KinesisSinkError {
    /// A record in the batch lacks the stream fields the transformer
    /// normally guarantees (namespace, timestamp, receivetime)
    #[error("batch contains a record missing stream fields")]
    MissingFields,

    /// The SDK rejected an entry before sending
    #[error("failed to build put-records entry: {0}")]
    Entry(#[from] BuildError),

    /// The `PutRecords` call itself failed
    #[error("put-records call failed: {0}")]
    PutRecords(#[from] SdkError<PutRecordsError>),
}
