//! Byte-budgeted record batch

use serde_json::Value as Json;

/// Submission threshold for one `PutRecords` call
pub const MAX_BATCH_BYTES: usize = 50 * 1024;

/// A stream record serialized once at intake
///
/// The parsed value rides along so the flush path can read the stream
/// fields (partition key, timestamps) without re-parsing the payload.
#[derive(Debug)]
pub struct EncodedRecord {
    pub json: Json,
    pub data: Vec<u8>,
}

impl EncodedRecord {
    /// Serialized payload size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Accumulator for one `PutRecords` batch
///
/// `push` hands a record back instead of splitting or dropping it when
/// it would blow the byte budget; the caller dispatches the batch and
/// retries the same record against the fresh one. A record larger than
/// the whole budget is still accepted into an empty batch, so it ships
/// alone rather than bouncing forever.
#[derive(Debug)]
pub struct StreamBatch {
    records: Vec<EncodedRecord>,
    bytes: usize,
    max_bytes: usize,
}

impl StreamBatch {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            records: Vec::new(),
            bytes: 0,
            max_bytes,
        }
    }

    /// Append a record, or return it untouched if it does not fit
    pub fn push(&mut self, record: EncodedRecord) -> Option<EncodedRecord> {
        if !self.records.is_empty() && self.bytes + record.len() > self.max_bytes {
            return Some(record);
        }
        self.bytes += record.len();
        self.records.push(record);
        None
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total serialized payload bytes currently batched
    pub fn byte_size(&self) -> usize {
        self.bytes
    }

    /// Take the batched records, leaving the batch empty
    pub fn take(&mut self) -> Vec<EncodedRecord> {
        self.bytes = 0;
        std::mem::take(&mut self.records)
    }
}
