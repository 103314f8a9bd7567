//! Periodic cluster node discovery
//!
//! Polls `/_cluster/state/nodes` on a known node and rebuilds the
//! [`NodeTable`] from the transport addresses in the response. A failed
//! poll keeps the current table; a working-but-stale node list beats an
//! empty one.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::nodes::NodeTable;

/// Subset of the cluster state response we care about
#[derive(Debug, Deserialize)]
struct ClusterState {
    #[serde(default)]
    nodes: HashMap<String, NodeState>,
}

#[derive(Debug, Deserialize)]
struct NodeState {
    transport_address: String,
}

/// Transport addresses come in wrappers like `inet[/10.0.1.5:9300]`;
/// the bare IPv4 inside is what we dial.
fn ipv4_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?:\d{1,3}\.){3}\d{1,3}").expect("static pattern compiles"))
}

/// Background refresher for the shared node table
pub struct ClusterDiscovery {
    client: reqwest::Client,
    nodes: Arc<NodeTable>,
    port: u16,
    interval: Duration,
}

impl ClusterDiscovery {
    /// `port` is the HTTP port appended to every discovered address;
    /// the cluster state only reports transport (9300-range) addresses.
    pub fn new(nodes: Arc<NodeTable>, port: u16, interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            nodes,
            port,
            interval,
        }
    }

    /// Poll forever on the configured interval
    ///
    /// The first refresh happens immediately, so a single seed endpoint
    /// fans out to the whole cluster right after startup.
    pub async fn run(self) {
        info!(interval = ?self.interval, "cluster discovery started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }

    /// One discovery cycle
    pub async fn refresh(&self) {
        let Some(node) = self.nodes.next() else {
            warn!("node table is empty, cannot run discovery");
            return;
        };
        let url = format!("http://{node}/_cluster/state/nodes");

        let state = match self.fetch_state(&url).await {
            Ok(state) => state,
            Err(error) => {
                warn!(%error, %url, "cluster discovery failed, keeping current node table");
                return;
            }
        };

        let endpoints = endpoints_from_state(&state, self.port);
        if endpoints.is_empty() {
            warn!(%url, "cluster state listed no usable nodes, keeping current node table");
            return;
        }

        debug!(nodes = endpoints.len(), "refreshed node table");
        self.nodes.replace(endpoints);
    }

    async fn fetch_state(&self, url: &str) -> Result<ClusterState, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

/// Extract write endpoints (`ip:port`) from a cluster state response
///
/// Nodes whose transport address holds no IPv4 literal are skipped.
/// The result is sorted so the table stays stable across refreshes
/// (the node map iterates in arbitrary order).
fn endpoints_from_state(state: &ClusterState, port: u16) -> Vec<String> {
    let mut endpoints = Vec::with_capacity(state.nodes.len());
    for (id, node) in &state.nodes {
        match ipv4_pattern().find(&node.transport_address) {
            Some(address) => endpoints.push(format!("{}:{}", address.as_str(), port)),
            None => warn!(
                node = %id,
                transport_address = %node.transport_address,
                "skipping node without an ipv4 transport address"
            ),
        }
    }
    endpoints.sort();
    endpoints
}

#[cfg(test)]
pub(super) fn endpoints_from_json(
    state: &serde_json::Value,
    port: u16,
) -> Result<Vec<String>, serde_json::Error> {
    let state: ClusterState = serde_json::from_value(state.clone())?;
    Ok(endpoints_from_state(&state, port))
}
