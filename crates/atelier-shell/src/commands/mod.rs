//! One module per host service area.
//!
//! Every command follows the same contract: subscribe to the events it
//! expects, send the request through a named wrapper, then pump the bridge
//! until the terminal event or the shell timeout. Commands never touch the
//! transport.

mod build;
mod docker;
mod files;
mod plugins;
mod system;
mod updates;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use atelier_bridge::{Bridge, BridgeError, Subscription};
use atelier_config::AtelierConfig;
use atelier_protocol::{EventKind, HostEvent};

use crate::cli::Command;

/// Exit code for a command that timed out waiting on the host.
pub const EXIT_TIMEOUT: u8 = 124;

pub fn execute(command: Command, bridge: &Bridge, config: &AtelierConfig) -> u8 {
    match command {
        Command::Info => system::info(bridge, config),
        Command::Build {
            source,
            output,
            flags,
        } => build::build(bridge, config, source, output, flags),
        Command::Run { path } => build::run(bridge, config, path),
        Command::Fs(cmd) => files::execute(cmd, bridge, config),
        Command::Docker(cmd) => docker::execute(cmd, bridge, config),
        Command::Plugin(cmd) => plugins::execute(cmd, bridge, config),
        Command::Update(cmd) => updates::execute(cmd, bridge, config),
        Command::Setup => updates::setup(bridge, config),
    }
}

/// Event sink shared between subscriptions and the command loop.
///
/// Handlers push into it during [`Bridge::pump`]; the loop drains it on the
/// same thread right after.
#[derive(Clone, Default)]
pub(crate) struct Collector {
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl Collector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Subscribe this collector to `kind` on `bridge`. The subscription must
    /// stay alive for as long as the command waits.
    pub(crate) fn watch(&self, bridge: &Bridge, kind: EventKind) -> Subscription {
        let events = Arc::clone(&self.events);
        bridge.on(kind, move |event: &HostEvent| {
            events.lock().unwrap().push(event.clone());
        })
    }

    fn drain(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

/// Pump the bridge until `visit` returns an exit code or the configured
/// request timeout elapses. Timeout policy lives here, not in the bridge.
pub(crate) fn await_events(
    bridge: &Bridge,
    config: &AtelierConfig,
    collector: &Collector,
    mut visit: impl FnMut(HostEvent) -> Option<u8>,
) -> u8 {
    let timeout = config.shell.request_timeout_ms;
    let deadline = Instant::now() + Duration::from_millis(timeout);
    loop {
        bridge.pump();
        for event in collector.drain() {
            if let Some(code) = visit(event) {
                return code;
            }
        }
        if Instant::now() >= deadline {
            eprintln!("timed out waiting for the host (after {timeout} ms)");
            return EXIT_TIMEOUT;
        }
        std::thread::sleep(Duration::from_millis(config.shell.poll_interval_ms));
    }
}

/// Report a fire-and-forget request that has no modeled reply.
pub(crate) fn dispatched(what: &str, result: Result<(), BridgeError>) -> u8 {
    match result {
        Ok(()) => {
            println!("{what}: request dispatched");
            0
        }
        Err(e) => {
            eprintln!("{what}: {e}");
            1
        }
    }
}

/// Report a failed send and map it to an exit code.
pub(crate) fn send_failed(what: &str, error: BridgeError) -> u8 {
    eprintln!("{what}: {error}");
    1
}
