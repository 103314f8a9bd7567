//! Forward-protocol TCP source
//!
//! Accepts client connections and decodes a stream of forward tuples
//! from each one, pushing the transformed documents onto the bounded
//! sink queues.
//!
//! # Contract
//!
//! - The read deadline is re-armed before every socket read; an idle
//!   connection past the expiry is logged and closed.
//! - Clean end-of-stream closes the connection without an error log.
//! - Any decode failure closes only that connection.
//! - Queue pushes block when the queue is full: a slow sink throttles
//!   every producer sharing its queue but leaves the other sink's queue
//!   alone.

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use chrono::Utc;
use serde_json::Value as Json;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use esrelay_protocol::FrameDecoder;

use crate::transform::Transformer;
use crate::SourceError;

/// Read buffer capacity per connection (64KB)
const READ_BUFFER_CAPACITY: usize = 64 * 1024;

/// Forward source configuration
#[derive(Debug, Clone)]
pub struct ForwardSourceConfig {
    /// Address to listen on, e.g. `0.0.0.0:24224`
    pub listen: String,

    /// Idle expiry; the deadline resets on every read
    pub expires: Duration,
}

/// Forward-protocol TCP source
///
/// Spawns one handler task per accepted connection. Handlers share the
/// transformer (read-only) and the sink queue senders, nothing else.
pub struct ForwardSource {
    config: ForwardSourceConfig,
    transformer: Transformer,
    index_tx: mpsc::Sender<Json>,
    stream_tx: Option<mpsc::Sender<Json>>,
}

impl ForwardSource {
    /// Create a new forward source
    ///
    /// `stream_tx` is `None` when the Kinesis pipeline is not configured;
    /// stream-record derivation is skipped entirely in that case.
    pub fn new(
        config: ForwardSourceConfig,
        transformer: Transformer,
        index_tx: mpsc::Sender<Json>,
        stream_tx: Option<mpsc::Sender<Json>>,
    ) -> Self {
        Self {
            config,
            transformer,
            index_tx,
            stream_tx,
        }
    }

    /// Run the source
    ///
    /// Binds the listen address (fatal on failure) and accepts
    /// connections until the process terminates. Transient accept errors
    /// are logged and skipped.
    pub async fn run(self) -> Result<(), SourceError> {
        let listener =
            TcpListener::bind(&self.config.listen)
                .await
                .map_err(|e| SourceError::Bind {
                    address: self.config.listen.clone(),
                    source: e,
                })?;

        tracing::info!(
            listen = %self.config.listen,
            expires = ?self.config.expires,
            kinesis = self.stream_tx.is_some(),
            "forward source listening"
        );

        let source = Arc::new(self);
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let source = Arc::clone(&source);
                    tokio::spawn(async move {
                        if let Err(e) = source.handle_connection(stream).await {
                            // Only queue teardown reaches here; it means the
                            // pipeline is shutting down.
                            tracing::debug!(peer = %peer, error = %e, "connection handler stopped");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error accepting connection");
                }
            }
        }
    }

    /// Handle a single client connection
    ///
    /// Loops: drain every complete record already buffered, then read
    /// more bytes under the idle deadline.
    async fn handle_connection(&self, mut stream: TcpStream) -> Result<(), SourceError> {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".into());

        let mut buf = BytesMut::with_capacity(READ_BUFFER_CAPACITY);
        let mut decoder = FrameDecoder::new();

        loop {
            loop {
                match decoder.decode(&mut buf) {
                    Ok(Some(record)) => {
                        let doc = self.transformer.index_document(&record);
                        // Blocking send: deliberate backpressure
                        if self.index_tx.send(doc).await.is_err() {
                            return Err(SourceError::QueueClosed);
                        }

                        if let Some(stream_tx) = &self.stream_tx {
                            if let Some(stream_record) = self
                                .transformer
                                .stream_record(&record, Utc::now().timestamp())
                            {
                                if stream_tx.send(stream_record).await.is_err() {
                                    return Err(SourceError::QueueClosed);
                                }
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(peer = %peer, error = %e, "protocol error, closing connection");
                        return Ok(());
                    }
                }
            }

            match tokio::time::timeout(self.config.expires, stream.read_buf(&mut buf)).await {
                // Deadline exceeded
                Err(_) => {
                    tracing::warn!(peer = %peer, expires = ?self.config.expires, "idle connection expired");
                    return Ok(());
                }
                // Clean end-of-stream: close silently
                Ok(Ok(0)) => {
                    tracing::debug!(
                        peer = %peer,
                        records = decoder.records_decoded(),
                        "connection closed by peer"
                    );
                    return Ok(());
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    tracing::warn!(peer = %peer, error = %e, "read error, closing connection");
                    return Ok(());
                }
            }
        }
    }
}
