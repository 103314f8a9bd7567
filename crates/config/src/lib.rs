//! esrelay configuration
//!
//! TOML-based configuration loading with sensible defaults. The defaults
//! form a working single-node setup (listen on 24224, write to
//! `localhost:9200`), so a minimal config only needs to override what
//! actually differs.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use esrelay_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[elasticsearch]\nnodes = [\"es1\"]").unwrap();
//! assert_eq!(config.elasticsearch.nodes, vec!["es1".to_string()]);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:24224"
//! expires = "5m"
//!
//! [elasticsearch]
//! nodes = ["es1", "es2"]
//! index = "fluentd-{YYYY}.{MM}.{DD}"
//! auto_discover = true
//!
//! [kinesis]
//! access_key = "AKIA..."
//! secret_key = "..."
//! region = "us-east-1"
//! stream = "metrics"
//! ```

mod elasticsearch;
mod error;
mod kinesis;
mod logging;
mod server;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use elasticsearch::ElasticsearchConfig;
pub use error::{ConfigError, Result};
pub use kinesis::KinesisConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use server::ServerConfig;

/// Main configuration structure
///
/// All sections are optional with sensible defaults, except `[kinesis]`
/// which is absent unless the secondary pipeline is wanted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forward-protocol listener settings
    pub server: ServerConfig,

    /// Elasticsearch bulk sink and discovery settings
    pub elasticsearch: ElasticsearchConfig,

    /// Optional Kinesis batch sink settings
    pub kinesis: Option<KinesisConfig>,

    /// Logging configuration
    pub logging: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid
    /// TOML, or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Every violation here is fatal at startup.
    fn validate(&self) -> Result<()> {
        if self.server.listen.is_empty() {
            return Err(ConfigError::MissingField {
                section: "server",
                field: "listen",
            });
        }
        if self.server.expires.is_zero() {
            return Err(ConfigError::InvalidValue {
                section: "server",
                field: "expires",
                reason: "must be a non-zero duration".into(),
            });
        }

        let es = &self.elasticsearch;
        if es.nodes.is_empty() {
            return Err(ConfigError::MissingField {
                section: "elasticsearch",
                field: "nodes",
            });
        }
        if es.max_docs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "max_docs",
                reason: "must be at least 1".into(),
            });
        }
        if es.queue_size == 0 {
            return Err(ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "queue_size",
                reason: "must be at least 1".into(),
            });
        }
        if es.index.is_empty() {
            return Err(ConfigError::MissingField {
                section: "elasticsearch",
                field: "index",
            });
        }
        // Zero intervals would panic inside the sink and discovery timers;
        // catch them here where the failure is a clean startup error.
        if es.flush_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "flush_interval",
                reason: "must be a non-zero duration".into(),
            });
        }
        if es.refresh_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "refresh_interval",
                reason: "must be a non-zero duration".into(),
            });
        }

        if let Some(kinesis) = &self.kinesis {
            for (field, value) in [
                ("access_key", &kinesis.access_key),
                ("secret_key", &kinesis.secret_key),
                ("region", &kinesis.region),
                ("stream", &kinesis.stream),
            ] {
                if value.is_empty() {
                    return Err(ConfigError::MissingField {
                        section: "kinesis",
                        field,
                    });
                }
            }
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config.server.listen, "0.0.0.0:24224");
        assert_eq!(config.elasticsearch.nodes, vec!["localhost".to_string()]);
        assert!(config.kinesis.is_none());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            [server]
            listen = "127.0.0.1:24224"
            expires = "30s"

            [elasticsearch]
            nodes = ["es1", "es2"]
            port = 9201
            index = "logs-{YYYY}.{MM}.{DD}"
            doc_type = "event"
            tag_field = "tag"
            time_field = "@timestamp"
            max_docs = 200
            flush_interval = "500ms"
            auto_discover = true
            refresh_interval = "30m"

            [kinesis]
            access_key = "AKIA"
            secret_key = "secret"
            region = "us-east-1"
            stream = "metrics"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.server.expires, Duration::from_secs(30));
        assert_eq!(config.elasticsearch.endpoints(), vec!["es1:9201", "es2:9201"]);
        assert_eq!(config.elasticsearch.tag_field.as_deref(), Some("tag"));
        assert_eq!(config.elasticsearch.time_field.as_deref(), Some("@timestamp"));
        assert_eq!(config.elasticsearch.max_docs, 200);
        assert_eq!(
            config.elasticsearch.flush_interval,
            Duration::from_millis(500)
        );
        assert!(config.elasticsearch.auto_discover);
        assert_eq!(
            config.elasticsearch.refresh_interval,
            Duration::from_secs(1800)
        );

        let kinesis = config.kinesis.unwrap();
        assert_eq!(kinesis.region, "us-east-1");
        assert_eq!(kinesis.stream, "metrics");
        assert_eq!(kinesis.effective_queue_size(), 500_000);

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_empty_nodes() {
        let err = Config::from_str("[elasticsearch]\nnodes = []").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                section: "elasticsearch",
                field: "nodes",
            }
        ));
    }

    #[test]
    fn test_rejects_zero_max_docs() {
        let err = Config::from_str("[elasticsearch]\nmax_docs = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "max_docs",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_flush_interval() {
        let err = Config::from_str("[elasticsearch]\nflush_interval = \"0s\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "flush_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_refresh_interval() {
        let err = Config::from_str("[elasticsearch]\nrefresh_interval = \"0s\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "elasticsearch",
                field: "refresh_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_expires() {
        let err = Config::from_str("[server]\nexpires = \"0s\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                section: "server",
                field: "expires",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_incomplete_kinesis() {
        let toml = r#"
            [kinesis]
            access_key = "AKIA"
            region = "us-east-1"
            stream = "metrics"
        "#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                section: "kinesis",
                field: "secret_key",
            }
        ));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let err = Config::from_str("[server\nlisten=").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_duration() {
        let err = Config::from_str("[server]\nexpires = \"tomorrow\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
