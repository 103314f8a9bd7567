//! esrelay - fluentd-forward to Elasticsearch/Kinesis relay
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (listen on 24224, write to localhost:9200)
//! esrelay
//!
//! # Run with a config file
//! esrelay --config configs/config.toml
//! ```

mod serve;

use anyhow::Result;
use clap::Parser;
use esrelay_config::{Config, LogFormat};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// esrelay - fluentd-forward to Elasticsearch/Kinesis relay
#[derive(Parser, Debug)]
#[command(name = "esrelay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (level, format) = resolve_logging(cli.log_level.as_deref(), cli.config.as_deref());
    init_logging(&level, format)?;

    serve::run(cli.config).await
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_logging(
    cli_level: Option<&str>,
    config_path: Option<&std::path::Path>,
) -> (String, LogFormat) {
    let config = config_path
        .filter(|path| path.exists())
        .and_then(|path| Config::from_file(path).ok());
    let format = config
        .as_ref()
        .map(|c| c.logging.format)
        .unwrap_or_default();

    if let Some(level) = cli_level {
        return (level.to_string(), format);
    }
    let level = config
        .map(|c| c.logging.level.as_str().to_string())
        .unwrap_or_else(|| "info".to_string());
    (level, format)
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Console => {
            registry
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            registry.with(fmt::layer().json()).init();
        }
    }

    Ok(())
}
