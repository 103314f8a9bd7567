//! Elasticsearch bulk sink
//!
//! Drains the index queue into an in-memory buffer and flushes it as one
//! `_bulk` request whenever any trigger fires: document count, serialized
//! byte size, or elapsed time since the last flush. Writes go round-robin
//! over the [`NodeTable`], which cluster discovery keeps current.

mod bulk;
mod discovery;
mod error;
mod index_name;
mod nodes;
mod sink;

pub use bulk::BulkBuffer;
pub use discovery::ClusterDiscovery;
pub use error::EsSinkError;
pub use index_name::{resolve, resolve_now};
pub use nodes::NodeTable;
pub use sink::{spawn_error_drain, EsSink, EsSinkConfig, FlushFailure};

// Test modules - only compiled during testing
#[cfg(test)]
mod bulk_test;
#[cfg(test)]
mod index_name_test;
