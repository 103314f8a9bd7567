//! Bulk sink run loop
//!
//! Design principles:
//! - A single task owns the buffer; no locking around flush decisions
//! - The target index is resolved at flush time, so a batch that spans
//!   midnight lands in the index of the moment it is written
//! - A failed flush never blocks ingestion: the batch is handed to the
//!   error drain and dropped

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as Json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::bulk::{build_body, BulkBuffer};
use super::error::EsSinkError;
use super::index_name::resolve_now;
use super::nodes::NodeTable;

/// Bulk sink settings
#[derive(Debug, Clone)]
pub struct EsSinkConfig {
    /// Index name pattern, e.g. `fluentd-{YYYY}.{MM}.{DD}`
    pub index_pattern: String,
    /// Mapping type set on every action line
    pub doc_type: String,
    /// Flush when this many documents are buffered
    pub max_docs: usize,
    /// Flush when the serialized buffer reaches this many bytes
    pub max_buffer_bytes: usize,
    /// Flush whatever is buffered at least this often
    pub flush_interval: Duration,
}

/// A batch that could not be written
///
/// Carries enough for the drain to log something useful; the documents
/// themselves are gone.
#[derive(Debug)]
pub struct FlushFailure {
    /// Number of documents in the failed batch
    pub docs: usize,
    /// Serialized size of the failed batch
    pub bytes: usize,
    /// What went wrong
    pub error: EsSinkError,
}

/// Elasticsearch bulk sink
///
/// Owns the receiving half of the index queue. Runs until the queue
/// closes, then performs a final flush.
pub struct EsSink {
    receiver: mpsc::Receiver<Json>,
    config: EsSinkConfig,
    nodes: Arc<NodeTable>,
    client: reqwest::Client,
    buffer: BulkBuffer,
    error_tx: mpsc::Sender<FlushFailure>,
    flushed: u64,
}

impl EsSink {
    pub fn new(
        config: EsSinkConfig,
        nodes: Arc<NodeTable>,
        receiver: mpsc::Receiver<Json>,
        error_tx: mpsc::Sender<FlushFailure>,
    ) -> Self {
        let buffer = BulkBuffer::new(config.max_docs, config.max_buffer_bytes);
        Self {
            receiver,
            config,
            nodes,
            client: reqwest::Client::new(),
            buffer,
            error_tx,
            flushed: 0,
        }
    }

    /// Drain the index queue until it closes
    pub async fn run(mut self) {
        info!(
            index_pattern = %self.config.index_pattern,
            max_docs = self.config.max_docs,
            flush_interval = ?self.config.flush_interval,
            "elasticsearch sink started"
        );

        let mut flush_interval = tokio::time::interval(self.config.flush_interval);
        flush_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                received = self.receiver.recv() => {
                    match received {
                        Some(doc) => {
                            if let Err(error) = self.buffer.push(&doc) {
                                warn!(%error, "dropping unserializable document");
                                continue;
                            }
                            if self.buffer.is_full() {
                                self.flush().await;
                            }
                        }
                        None => {
                            self.flush().await;
                            info!(
                                documents = self.flushed,
                                "index queue closed, elasticsearch sink stopping"
                            );
                            return;
                        }
                    }
                }
                _ = flush_interval.tick() => {
                    self.flush().await;
                }
            }
        }
    }

    /// Write out the current buffer, reporting failures to the drain
    async fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let docs = self.buffer.take();
        let count = docs.len();
        let bytes: usize = docs.iter().map(Vec::len).sum();

        match self.send_bulk(&docs).await {
            Ok(()) => {
                self.flushed += count as u64;
                debug!(documents = count, bytes, "flushed bulk batch");
            }
            Err(error) => {
                let failure = FlushFailure {
                    docs: count,
                    bytes,
                    error,
                };
                if self.error_tx.try_send(failure).is_err() {
                    warn!(documents = count, "error drain full, dropping failure report");
                }
            }
        }
    }

    async fn send_bulk(&self, docs: &[Vec<u8>]) -> Result<(), EsSinkError> {
        let node = self.nodes.next().ok_or(EsSinkError::NoNodes)?;
        let index = resolve_now(&self.config.index_pattern);
        let body = build_body(&index, &self.config.doc_type, docs);

        let response = self
            .client
            .post(format!("http://{node}/_bulk"))
            .header("content-type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EsSinkError::Status {
                node,
                status: status.as_u16(),
            });
        }

        // Only the top-level errors flag matters here; anything we cannot
        // parse counts as success since the cluster accepted the request.
        #[derive(serde::Deserialize)]
        struct BulkResponse {
            #[serde(default)]
            errors: bool,
        }

        match response.json::<BulkResponse>().await {
            Ok(parsed) if parsed.errors => Err(EsSinkError::ItemsFailed),
            _ => Ok(()),
        }
    }
}

/// Log every flush failure coming out of the sink
///
/// Callers that want different handling can consume the receiver
/// themselves instead of spawning this.
pub fn spawn_error_drain(mut receiver: mpsc::Receiver<FlushFailure>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(failure) = receiver.recv().await {
            warn!(
                documents = failure.docs,
                bytes = failure.bytes,
                error = %failure.error,
                "dropped bulk batch"
            );
        }
    })
}
