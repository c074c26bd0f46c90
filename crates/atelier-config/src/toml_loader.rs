//! TOML config loading: read from a path or the platform default.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConfigError;
use crate::schema::AtelierConfig;

/// Load config from a specific TOML file path.
///
/// Deserializes with serde defaults for any missing fields. Validation is
/// the caller's concern (see [`crate::load_config`]).
pub fn load_from_path(path: &Path) -> Result<AtelierConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
        }
    })?;

    let config: AtelierConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/atelier/config.toml`
/// On Linux: `~/.config/atelier/config.toml`
///
/// If the file does not exist, creates a commented default config file and
/// returns defaults.
pub fn load_default() -> Result<AtelierConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(AtelierConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("atelier").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Generate the default TOML config content with comments.
fn default_config_toml() -> &'static str {
    r##"# atelier configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[host]
# WebSocket endpoint of the host bridge. When nothing answers here within
# connect_timeout_ms, atelier falls back to the canned stub transport.
# url = "ws://127.0.0.1:7420/bridge"
# connect_timeout_ms = 1500

[stub]
# Reply timings of the stub transport (development only).
# announce_delay_ms = 500
# reply_delay_ms = 100

[shell]
# How long commands wait for the host's terminal event, and how often the
# bridge is pumped while waiting.
# request_timeout_ms = 10000
# poll_interval_ms = 25

[logging]
# trace, debug, info, warn, error
# level = "info"
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[host\nurl = ").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn loads_a_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[shell]
request_timeout_ms = 250

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.shell.request_timeout_ms, 250);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.host.url, "ws://127.0.0.1:7420/bridge");
    }

    #[test]
    fn template_round_trips_through_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        create_default_config(&path).unwrap();

        let config = load_from_path(&path).unwrap();
        let defaults = AtelierConfig::default();
        assert_eq!(config.host.url, defaults.host.url);
        assert_eq!(config.shell.request_timeout_ms, defaults.shell.request_timeout_ms);
        assert_eq!(config.logging.level, defaults.logging.level);
    }

    #[test]
    fn create_default_config_makes_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("config.toml");
        create_default_config(&path).unwrap();
        assert!(path.exists());
    }
}
