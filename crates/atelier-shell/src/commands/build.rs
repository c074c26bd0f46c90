//! `atelier build` and `atelier run` — compile and execute on the host.

use std::io::Write;

use atelier_bridge::Bridge;
use atelier_config::AtelierConfig;
use atelier_protocol::{EventKind, HostEvent};

use super::{await_events, send_failed, Collector};

pub(super) fn build(
    bridge: &Bridge,
    config: &AtelierConfig,
    source: String,
    output: String,
    flags: Vec<String>,
) -> u8 {
    let collector = Collector::new();
    let _logs = collector.watch(bridge, EventKind::BuildLog);
    let _done = collector.watch(bridge, EventKind::BuildComplete);

    if let Err(e) = bridge.build(source, output, flags) {
        return send_failed("build", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::BuildLog { message } => {
            // Log lines carry their own newlines.
            print!("{message}");
            let _ = std::io::stdout().flush();
            None
        }
        HostEvent::BuildComplete {
            success,
            message,
            output_file,
        } => {
            match output_file {
                Some(file) => println!("{message} ({file})"),
                None => println!("{message}"),
            }
            Some(u8::from(!success))
        }
        _ => None,
    })
}

pub(super) fn run(bridge: &Bridge, config: &AtelierConfig, path: String) -> u8 {
    let collector = Collector::new();
    let _logs = collector.watch(bridge, EventKind::RunLog);
    let _done = collector.watch(bridge, EventKind::RunComplete);

    if let Err(e) = bridge.run(path) {
        return send_failed("run", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::RunLog { message } => {
            print!("{message}");
            let _ = std::io::stdout().flush();
            None
        }
        HostEvent::RunComplete { success, exit_code } => {
            let code = exit_code.unwrap_or(if success { 0 } else { 1 });
            Some(u8::try_from(code).unwrap_or(1))
        }
        _ => None,
    })
}
