mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Duration;

use atelier_bridge::{Bridge, ConnectOptions, StubTimings};
use atelier_config::AtelierConfig;
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- atelier crashed ---");
        eprintln!("Please report this issue at: https://github.com/atelier-ide/atelier/issues");
        eprintln!("-----------------------\n");
        default_hook(info);
    }));
}

/// Load environment variables from a .env file (KEY=VALUE lines). Existing
/// process environment wins.
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/atelier-shell/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

/// Resolve the host endpoint: CLI flag, then `ATELIER_HOST_URL`, then
/// config. `--stub` skips detection entirely.
fn resolve_host_url(args: &cli::Args, config: &AtelierConfig) -> Option<String> {
    if args.stub {
        return None;
    }
    args.host_url
        .clone()
        .or_else(|| std::env::var("ATELIER_HOST_URL").ok())
        .or_else(|| Some(config.host.url.clone()))
}

fn main() -> ExitCode {
    load_dotenv();
    install_panic_hook();

    let args = cli::parse();

    // Config is loaded before the subscriber so [logging] can supply the
    // default directive; its outcome is logged right after init.
    let config_path = args.config.as_deref().map(std::path::Path::new);
    let loaded = atelier_config::load_config(config_path);

    let directive = args.log_level.clone().unwrap_or_else(|| match &loaded {
        Ok(config) => config.logging.level.clone(),
        Err(_) => "info".into(),
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("atelier v{} starting", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e}");
        AtelierConfig::default()
    });

    let options = ConnectOptions {
        host_url: resolve_host_url(&args, &config),
        connect_timeout: Duration::from_millis(config.host.connect_timeout_ms),
        stub: StubTimings {
            announce_delay: Duration::from_millis(config.stub.announce_delay_ms),
            reply_delay: Duration::from_millis(config.stub.reply_delay_ms),
        },
    };
    let bridge = Bridge::connect(&options);
    tracing::info!(mode = %bridge.mode(), "bridge connected");

    ExitCode::from(commands::execute(args.command, &bridge, &config))
}
