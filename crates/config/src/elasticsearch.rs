//! Elasticsearch target configuration
//!
//! Covers the bulk-indexing policy, the index-name pattern, and cluster
//! auto-discovery.

use std::time::Duration;

use serde::Deserialize;

/// Elasticsearch sink and discovery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElasticsearchConfig {
    /// Initial node list (hostnames or IPs, without port)
    pub nodes: Vec<String>,

    /// HTTP port appended to every node address
    pub port: u16,

    /// Index name pattern with date placeholders,
    /// e.g. `fluentd-{YYYY}.{MM}.{DD}`
    pub index: String,

    /// Document type label attached to every bulk action
    pub doc_type: String,

    /// If set, the record tag is copied into each document under this key
    pub tag_field: Option<String>,

    /// If set, the record timestamp (milliseconds) is copied into each
    /// document under this key
    pub time_field: Option<String>,

    /// Max number of documents to hold in the buffer before forcing a flush
    pub max_docs: usize,

    /// Max serialized buffer size in bytes before forcing a flush
    pub max_buffer_bytes: usize,

    /// Max delay before a partial buffer is flushed
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,

    /// Periodically re-resolve the live cluster node set instead of
    /// sticking to the configured nodes
    pub auto_discover: bool,

    /// Interval between discovery cycles when auto_discover is on
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,

    /// Bounded queue size between the listener and the bulk flusher;
    /// a full queue blocks producers (backpressure)
    pub queue_size: usize,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["localhost".into()],
            port: 9200,
            index: "fluentd-{YYYY}.{MM}.{DD}".into(),
            doc_type: "main".into(),
            tag_field: None,
            time_field: None,
            max_docs: 1000,
            max_buffer_bytes: 10 * 1024 * 1024,
            flush_interval: Duration::from_secs(1),
            auto_discover: false,
            refresh_interval: Duration::from_secs(60 * 60),
            queue_size: 500_000,
        }
    }
}

impl ElasticsearchConfig {
    /// Initial write endpoints: every configured node with the port appended
    pub fn endpoints(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|node| format!("{}:{}", node, self.port))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_flag_defaults() {
        let config = ElasticsearchConfig::default();
        assert_eq!(config.nodes, vec!["localhost".to_string()]);
        assert_eq!(config.port, 9200);
        assert_eq!(config.index, "fluentd-{YYYY}.{MM}.{DD}");
        assert_eq!(config.doc_type, "main");
        assert_eq!(config.tag_field, None);
        assert_eq!(config.time_field, None);
        assert_eq!(config.max_docs, 1000);
        assert_eq!(config.max_buffer_bytes, 10_485_760);
        assert_eq!(config.flush_interval, Duration::from_secs(1));
        assert!(!config.auto_discover);
    }

    #[test]
    fn test_endpoints_append_port() {
        let config = ElasticsearchConfig {
            nodes: vec!["es1".into(), "10.0.0.2".into()],
            port: 9201,
            ..Default::default()
        };
        assert_eq!(config.endpoints(), vec!["es1:9201", "10.0.0.2:9201"]);
    }
}
