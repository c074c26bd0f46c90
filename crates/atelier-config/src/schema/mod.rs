//! Configuration schema types for atelier.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod host;
mod logging;
mod shell;
mod stub;

pub use host::*;
pub use logging::*;
pub use shell::*;
pub use stub::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for atelier.
///
/// Only override what you want to change; missing fields use defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    pub host: HostConfig,
    pub stub: StubConfig,
    pub shell: ShellConfig,
    pub logging: LoggingConfig,
}
