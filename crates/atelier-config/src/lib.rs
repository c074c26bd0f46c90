//! atelier configuration system.
//!
//! TOML-based configuration with serde defaults throughout, so partial
//! configs work out of the box. A missing config file is created from a
//! commented template on first run.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = atelier_config::load_config(None).expect("failed to load config");
//! println!("host endpoint: {}", config.host.url);
//! ```

pub mod error;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use error::ConfigError;
pub use schema::{
    AtelierConfig, HostConfig, LoggingConfig, ShellConfig, StubConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

/// Load config from `path_override`, or the platform default path when
/// `None` (creating the default file on first run).
///
/// A config that parses but fails validation logs a warning and falls back
/// to defaults; an explicitly overridden path that is missing or malformed
/// is a hard error.
pub fn load_config(path_override: Option<&Path>) -> Result<AtelierConfig, ConfigError> {
    let config = match path_override {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    match validation::validate(&config) {
        Ok(()) => Ok(config),
        Err(e) => {
            tracing::warn!("config validation failed, using defaults: {e}");
            Ok(AtelierConfig::default())
        }
    }
}
