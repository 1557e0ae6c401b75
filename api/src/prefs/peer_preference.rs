use crate::peers::PeerPool;
use serde::Deserialize;
use serde::Serialize;
use std::env;

/// Which nodes the wallet talks to.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PeerPreference {
    /// Nodes that serve the API to anyone. Preferred for failover.
    pub open_api_peers: Vec<String>,
    /// Nodes that allow cross-origin API calls. Used when no open-API peer
    /// is configured.
    pub cors_peers: Vec<String>,
}

impl PeerPreference {
    /// A node on the local machine, on the default API port.
    pub const DEFAULT_PEER: &'static str = "http://localhost:7876";

    /// Creates a PeerPreference instance from environment variables,
    /// with a conservative in-code default.
    ///
    /// # Environment Variables
    /// - `NXT_OPEN_API_PEERS`: comma separated node base URLs.
    /// - `NXT_CORS_PEERS`: comma separated node base URLs.
    ///   defaults to `http://localhost:7876` when neither list is set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let open_api_peers = lookup("NXT_OPEN_API_PEERS")
            .map(|v| split_list(&v))
            .unwrap_or_default();
        let mut cors_peers = lookup("NXT_CORS_PEERS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        if open_api_peers.is_empty() && cors_peers.is_empty() {
            cors_peers.push(Self::DEFAULT_PEER.to_string());
        }

        Self {
            open_api_peers,
            cors_peers,
        }
    }

    pub fn to_pool(&self) -> PeerPool {
        PeerPool::new(self.open_api_peers.clone(), self.cors_peers.clone())
    }
}

impl Default for PeerPreference {
    fn default() -> Self {
        Self::from_env()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
