//! Active node table
//!
//! The one piece of mutable state shared between tasks outside the
//! queues. Discovery is the single writer and replaces the whole list
//! atomically; the bulk sink reads a consistent snapshot on every write,
//! so no reader can ever observe a partially updated list.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

/// Atomically replaceable list of write endpoints (`host:port`)
///
/// Reads are lock-free; writes swap in a whole new list (copy-on-write).
/// Endpoint selection round-robins across the current snapshot.
#[derive(Debug)]
pub struct NodeTable {
    endpoints: ArcSwap<Vec<String>>,
    cursor: AtomicUsize,
}

impl NodeTable {
    /// Create a table seeded with the configured endpoints
    pub fn new(initial: Vec<String>) -> Self {
        Self {
            endpoints: ArcSwap::from_pointee(initial),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Atomically replace the whole endpoint list
    ///
    /// An empty replacement is refused: a discovery cycle that found no
    /// nodes must not wipe out a working table (stale-but-available beats
    /// failing every write).
    pub fn replace(&self, endpoints: Vec<String>) {
        if endpoints.is_empty() {
            tracing::warn!("refusing to replace node table with an empty list");
            return;
        }
        self.endpoints.store(Arc::new(endpoints));
    }

    /// Snapshot of the current endpoint list
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        self.endpoints.load_full()
    }

    /// Next endpoint, round-robin
    pub fn next(&self) -> Option<String> {
        let endpoints = self.endpoints.load();
        if endpoints.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % endpoints.len();
        Some(endpoints[index].clone())
    }

    /// Number of endpoints currently in the table
    pub fn len(&self) -> usize {
        self.endpoints.load().len()
    }

    /// True when the table holds no endpoints
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
