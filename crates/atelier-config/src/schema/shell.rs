//! Shell command-loop configuration.

use serde::{Deserialize, Serialize};

/// Timing policy for the shell's await loops. Waiting for a response is
/// shell policy, not a bridge feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// How long a command waits for its terminal event before giving up.
    pub request_timeout_ms: u64,
    /// How often the command loop pumps the bridge.
    pub poll_interval_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            poll_interval_ms: 25,
        }
    }
}
