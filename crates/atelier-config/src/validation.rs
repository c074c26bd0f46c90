//! Semantic validation of a parsed config.
//!
//! All checks run; errors are collected into a single `ConfigError` so one
//! pass reports everything wrong with a file.

use crate::error::ConfigError;
use crate::schema::AtelierConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AtelierConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_host(&mut errors, config);
    validate_shell(&mut errors, config);
    validate_logging(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_host(errors: &mut Vec<String>, config: &AtelierConfig) {
    let url = &config.host.url;
    if url.is_empty() {
        errors.push("host.url must not be empty".into());
    } else if !url.starts_with("ws://") && !url.starts_with("wss://") {
        errors.push(format!("host.url must be a ws:// or wss:// URL, got '{url}'"));
    }
    if config.host.connect_timeout_ms == 0 {
        errors.push("host.connect_timeout_ms must be positive".into());
    }
}

fn validate_shell(errors: &mut Vec<String>, config: &AtelierConfig) {
    if config.shell.request_timeout_ms == 0 {
        errors.push("shell.request_timeout_ms must be positive".into());
    }
    if config.shell.poll_interval_ms == 0 {
        errors.push("shell.poll_interval_ms must be positive".into());
    }
}

fn validate_logging(errors: &mut Vec<String>, config: &AtelierConfig) {
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(format!(
            "logging.level must be one of {LOG_LEVELS:?}, got '{}'",
            config.logging.level
        ));
    }
}
