//! `atelier plugin` — plugin listing and generation.

use atelier_bridge::Bridge;
use atelier_config::AtelierConfig;
use atelier_protocol::{EventKind, HostEvent};

use super::{await_events, send_failed, Collector};
use crate::cli::PluginCommand;

pub(super) fn execute(command: PluginCommand, bridge: &Bridge, config: &AtelierConfig) -> u8 {
    match command {
        PluginCommand::Ls => ls(bridge, config),
        PluginCommand::New { name, code_file } => new(bridge, config, name, code_file),
    }
}

fn ls(bridge: &Bridge, config: &AtelierConfig) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::PluginList);

    if let Err(e) = bridge.list_plugins() {
        return send_failed("plugin ls", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::PluginList { success, plugins } => {
            if !success {
                eprintln!("plugin ls: host could not list plugins");
                return Some(1);
            }
            for plugin in plugins {
                println!(
                    "{:<24} {:<10} {:<9} {} — {}",
                    plugin.name,
                    plugin.version,
                    if plugin.enabled { "enabled" } else { "disabled" },
                    plugin.author,
                    plugin.description
                );
            }
            Some(0)
        }
        _ => None,
    })
}

fn new(bridge: &Bridge, config: &AtelierConfig, name: String, code_file: String) -> u8 {
    let code = match std::fs::read_to_string(&code_file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("plugin new: failed to read {code_file}: {e}");
            return 1;
        }
    };

    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::PluginGenerated);

    if let Err(e) = bridge.generate_plugin(name, code) {
        return send_failed("plugin new", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::PluginGenerated { success, message } => {
            println!("{message}");
            Some(u8::from(!success))
        }
        _ => None,
    })
}
