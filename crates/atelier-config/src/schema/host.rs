//! Host channel configuration.

use serde::{Deserialize, Serialize};

/// Where to look for the host process's bridge endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// WebSocket endpoint of the host bridge (`ws://` or `wss://`).
    pub url: String,
    /// How long detection may probe before falling back to the stub.
    pub connect_timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:7420/bridge".into(),
            connect_timeout_ms: 1500,
        }
    }
}
