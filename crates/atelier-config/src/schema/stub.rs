//! Stub transport timings.

use serde::{Deserialize, Serialize};

/// Reply timings for the canned stub transport (development only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StubConfig {
    /// Delay before the stub's spontaneous `systemInfo` announcement.
    pub announce_delay_ms: u64,
    /// Base reply delay; the scripted build sequence scales from it.
    pub reply_delay_ms: u64,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            announce_delay_ms: 500,
            reply_delay_ms: 100,
        }
    }
}
