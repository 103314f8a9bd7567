//! esrelay sinks
//!
//! Batching consumers for the two downstream targets:
//!
//! - **Elasticsearch** - bulk indexing with count/byte/age flush
//!   triggers, rolling index names, and live cluster discovery.
//! - **Kinesis** - byte-budgeted batches dispatched asynchronously to a
//!   managed stream.
//!
//! # Design Principles
//!
//! - **Exclusive buffers**: each sink's accumulation buffer is owned by
//!   that sink's task; nothing else touches it.
//! - **Errors never flow upstream**: a failed flush is logged (or handed
//!   to the error drain) and the batch dropped; producers only ever feel
//!   a sink through queue backpressure.
//! - **No retries here**: retry/backoff belongs to the transport layer,
//!   not the ingestion pipeline.

pub mod elasticsearch;
pub mod kinesis;
