//! Bulk accumulation buffer
//!
//! Documents are serialized once on entry; the buffer tracks the running
//! byte size so the flush decision never re-serializes anything.

use serde_json::{json, Value as Json};

use super::EsSinkError;

/// Document buffer with count and byte-size flush triggers
///
/// The age trigger lives in the sink's run loop (a flush-interval timer),
/// not here; the buffer itself is pure state.
#[derive(Debug)]
pub struct BulkBuffer {
    docs: Vec<Vec<u8>>,
    bytes: usize,
    max_docs: usize,
    max_bytes: usize,
}

impl BulkBuffer {
    /// Create an empty buffer with the given flush thresholds
    pub fn new(max_docs: usize, max_bytes: usize) -> Self {
        Self {
            docs: Vec::with_capacity(max_docs.min(4096)),
            bytes: 0,
            max_docs,
            max_bytes,
        }
    }

    /// Serialize and append one document
    pub fn push(&mut self, doc: &Json) -> Result<(), EsSinkError> {
        let serialized = serde_json::to_vec(doc)?;
        self.bytes += serialized.len();
        self.docs.push(serialized);
        Ok(())
    }

    /// True when either the count or the byte-size trigger has fired
    pub fn is_full(&self) -> bool {
        self.docs.len() >= self.max_docs || self.bytes >= self.max_bytes
    }

    /// Number of buffered documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Serialized size of the buffered documents in bytes
    pub fn byte_size(&self) -> usize {
        self.bytes
    }

    /// Take the buffered documents, leaving the buffer empty
    pub fn take(&mut self) -> Vec<Vec<u8>> {
        self.bytes = 0;
        std::mem::take(&mut self.docs)
    }
}

/// Render a `_bulk` request body (NDJSON)
///
/// Every document gets an action line naming the target index and type;
/// no `_id` is set, so the engine auto-assigns one. Document order is
/// the buffer order.
pub fn build_body(index: &str, doc_type: &str, docs: &[Vec<u8>]) -> Vec<u8> {
    let action = json!({"index": {"_index": index, "_type": doc_type}});
    // serde_json cannot fail on a value built from strings
    let action_line = action.to_string();

    let mut body = Vec::with_capacity(docs.iter().map(|d| d.len() + action_line.len() + 2).sum());
    for doc in docs {
        body.extend_from_slice(action_line.as_bytes());
        body.push(b'\n');
        body.extend_from_slice(doc);
        body.push(b'\n');
    }
    body
}
