//! Server wiring
//!
//! Loads configuration, builds the queues, spawns the sinks and
//! discovery, and runs the forward listener until it fails or a shutdown
//! signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;

use esrelay_config::Config;
use esrelay_sinks::elasticsearch::{
    spawn_error_drain, ClusterDiscovery, EsSink, EsSinkConfig, NodeTable,
};
use esrelay_sinks::kinesis::{KinesisSink, KinesisSinkConfig};
use esrelay_sources::{ForwardSource, ForwardSourceConfig, Transformer};

/// Failure reports are small and drained immediately; this never needs
/// to scale with the data queues.
const ERROR_QUEUE_SIZE: usize = 1024;

/// Load configuration and run the relay
pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(default)".to_string()),
        "esrelay starting"
    );

    let config = load_config(config_path)?;
    run_server(config).await
}

/// Resolve the configuration: an explicit path must exist; otherwise try
/// the default paths and fall back to built-in defaults.
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "config file not found: {}",
                    path.display()
                ));
            }
            Config::from_file(&path).context("failed to load configuration")
        }
        None => {
            let default_paths = [
                PathBuf::from("configs/config.toml"),
                PathBuf::from("config.toml"),
            ];

            for path in &default_paths {
                if path.exists() {
                    info!(config = %path.display(), "using config file");
                    return Config::from_file(path).context("failed to load configuration");
                }
            }

            info!("no config file found, using defaults (24224 → localhost:9200)");
            Ok(Config::default())
        }
    }
}

async fn run_server(config: Config) -> Result<()> {
    let es = &config.elasticsearch;
    info!(
        listen = %config.server.listen,
        expires = ?config.server.expires,
        nodes = ?es.nodes,
        index = %es.index,
        max_docs = es.max_docs,
        auto_discover = es.auto_discover,
        kinesis = config.kinesis.is_some(),
        "configuration loaded"
    );

    let nodes = Arc::new(NodeTable::new(es.endpoints()));

    // Elasticsearch pipeline: index queue → bulk sink, failures → drain
    let (index_tx, index_rx) = mpsc::channel(es.queue_size);
    let (error_tx, error_rx) = mpsc::channel(ERROR_QUEUE_SIZE);

    let sink = EsSink::new(
        EsSinkConfig {
            index_pattern: es.index.clone(),
            doc_type: es.doc_type.clone(),
            max_docs: es.max_docs,
            max_buffer_bytes: es.max_buffer_bytes,
            flush_interval: es.flush_interval,
        },
        Arc::clone(&nodes),
        index_rx,
        error_tx,
    );
    tokio::spawn(sink.run());
    spawn_error_drain(error_rx);

    if es.auto_discover {
        let discovery = ClusterDiscovery::new(Arc::clone(&nodes), es.port, es.refresh_interval);
        tokio::spawn(discovery.run());
    }

    // Kinesis pipeline, only when configured
    let stream_tx = match &config.kinesis {
        Some(kinesis) => {
            let (stream_tx, stream_rx) = mpsc::channel(kinesis.effective_queue_size());
            let sink = KinesisSink::new(
                KinesisSinkConfig {
                    access_key: kinesis.access_key.clone(),
                    secret_key: kinesis.secret_key.clone(),
                    region: kinesis.region.clone(),
                    stream_name: kinesis.stream.clone(),
                },
                stream_rx,
            );
            tokio::spawn(sink.run());
            Some(stream_tx)
        }
        None => None,
    };

    let transformer = Transformer {
        tag_field: es.tag_field.clone(),
        time_field: es.time_field.clone(),
    };
    let source = ForwardSource::new(
        ForwardSourceConfig {
            listen: config.server.listen.clone(),
            expires: config.server.expires,
        },
        transformer,
        index_tx,
        stream_tx,
    );

    tokio::select! {
        result = source.run() => {
            result.context("forward source failed")?;
        }
        result = signal::ctrl_c() => {
            result.context("failed to install Ctrl+C handler")?;
            info!("shutdown signal received, stopping relay");
        }
    }

    Ok(())
}
