//! Kinesis sink run loop
//!
//! Design principles:
//! - Polling, not awaiting: the loop drains whatever is queued, ships a
//!   partial batch when the queue runs dry, then sleeps briefly
//! - A record refused by a full batch waits in a one-slot overflow and is
//!   retried first against the fresh batch, keeping stream order
//! - Submission runs in its own task; a slow `PutRecords` call never
//!   blocks intake

use std::time::Duration;

use aws_sdk_kinesis::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;
use aws_sdk_kinesis::Client;
use chrono::Utc;
use serde_json::Value as Json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use super::batch::{EncodedRecord, StreamBatch, MAX_BATCH_BYTES};
use super::error::KinesisSinkError;

/// How long to sleep when the queue has nothing to offer
const POLL_IDLE: Duration = Duration::from_millis(100);

/// Kinesis sink settings, straight from the `[kinesis]` config table
#[derive(Debug, Clone)]
pub struct KinesisSinkConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub stream_name: String,
}

/// Kinesis batch sink
///
/// Owns the receiving half of the stream queue. Runs until the queue
/// closes, then dispatches whatever is batched.
pub struct KinesisSink {
    receiver: mpsc::Receiver<Json>,
    client: Client,
    stream_name: String,
    batch: StreamBatch,
    overflow: Option<EncodedRecord>,
}

impl KinesisSink {
    pub fn new(config: KinesisSinkConfig, receiver: mpsc::Receiver<Json>) -> Self {
        let credentials = Credentials::new(
            config.access_key,
            config.secret_key,
            None,
            None,
            "esrelay-config",
        );
        let sdk_config = aws_sdk_kinesis::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .build();

        Self {
            receiver,
            client: Client::from_conf(sdk_config),
            stream_name: config.stream_name,
            batch: StreamBatch::new(MAX_BATCH_BYTES),
            overflow: None,
        }
    }

    /// Poll the stream queue until it closes
    pub async fn run(mut self) {
        info!(stream = %self.stream_name, "kinesis sink started");

        loop {
            let next = match self.overflow.take() {
                Some(record) => Some(record),
                None => match self.receiver.try_recv() {
                    Ok(doc) => encode(doc),
                    Err(TryRecvError::Empty) => {
                        self.dispatch();
                        tokio::time::sleep(POLL_IDLE).await;
                        continue;
                    }
                    Err(TryRecvError::Disconnected) => {
                        self.dispatch();
                        info!("stream queue closed, kinesis sink stopping");
                        return;
                    }
                },
            };

            if let Some(record) = next {
                if let Some(refused) = self.batch.push(record) {
                    self.overflow = Some(refused);
                    self.dispatch();
                }
            }
        }
    }

    /// Hand the current batch to a submission task
    fn dispatch(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let records = self.batch.take();
        let client = self.client.clone();
        let stream_name = self.stream_name.clone();
        tokio::spawn(async move {
            flush_batch(client, stream_name, records).await;
        });
    }
}

fn encode(json: Json) -> Option<EncodedRecord> {
    match serde_json::to_vec(&json) {
        Ok(data) => Some(EncodedRecord { json, data }),
        Err(error) => {
            warn!(%error, "dropping unserializable stream record");
            None
        }
    }
}

/// The stream fields every transformer-built record carries
pub(super) fn stream_fields(json: &Json) -> Option<(&str, i64, i64)> {
    let namespace = json.get("namespace")?.as_str()?;
    let timestamp = json.get("timestamp")?.as_i64()?;
    let receivetime = json.get("receivetime")?.as_i64()?;
    Some((namespace, timestamp, receivetime))
}

/// Build the `PutRecords` entries for a batch
///
/// One malformed record fails the whole batch; nothing is partially
/// submitted.
pub(super) fn build_entries(
    records: &[EncodedRecord],
) -> Result<Vec<PutRecordsRequestEntry>, KinesisSinkError> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        let (namespace, _, _) =
            stream_fields(&record.json).ok_or(KinesisSinkError::MissingFields)?;
        let entry = PutRecordsRequestEntry::builder()
            .data(Blob::new(record.data.clone()))
            .partition_key(namespace)
            .build()?;
        entries.push(entry);
    }
    Ok(entries)
}

async fn flush_batch(client: Client, stream_name: String, records: Vec<EncodedRecord>) {
    let bytes: usize = records.iter().map(EncodedRecord::len).sum();
    let count = records.len();

    // Timing is reported from the newest record in the batch
    let Some((_, original_timestamp, receive_timestamp)) =
        records.last().and_then(|record| stream_fields(&record.json))
    else {
        debug!(records = count, "discarding batch with records missing stream fields");
        return;
    };
    let entries = match build_entries(&records) {
        Ok(entries) => entries,
        Err(error) => {
            debug!(%error, records = count, "discarding malformed kinesis batch");
            return;
        }
    };

    match submit(&client, &stream_name, entries).await {
        Ok(failed) => {
            info!(
                bytes,
                records = count,
                original_timestamp,
                receive_timestamp,
                submit_timestamp = Utc::now().timestamp(),
                "submitted kinesis batch"
            );
            if failed > 0 {
                warn!(failed, "kinesis rejected some records in the batch");
            }
        }
        Err(error) => {
            warn!(%error, bytes, records = count, "failed to submit kinesis batch, dropping");
        }
    }
}

async fn submit(
    client: &Client,
    stream_name: &str,
    entries: Vec<PutRecordsRequestEntry>,
) -> Result<i32, KinesisSinkError> {
    let output = client
        .put_records()
        .stream_name(stream_name)
        .set_records(Some(entries))
        .send()
        .await?;
    Ok(output.failed_record_count().unwrap_or(0))
}
