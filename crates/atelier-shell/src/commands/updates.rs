//! `atelier update` and `atelier setup` — updater and toolchain install.

use atelier_bridge::Bridge;
use atelier_config::AtelierConfig;
use atelier_protocol::{EventKind, HostEvent};

use super::{await_events, send_failed, Collector};
use crate::cli::UpdateCommand;

pub(super) fn execute(command: UpdateCommand, bridge: &Bridge, config: &AtelierConfig) -> u8 {
    match command {
        UpdateCommand::Check => check(bridge, config),
        UpdateCommand::Download => download(bridge, config),
    }
}

fn check(bridge: &Bridge, config: &AtelierConfig) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::UpdateCheck);

    if let Err(e) = bridge.check_updates() {
        return send_failed("update check", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::UpdateCheck {
            success,
            update_available,
            update_info,
        } => {
            if !success {
                eprintln!("update check: host check failed");
                return Some(1);
            }
            if !update_available {
                println!("already up to date");
                return Some(0);
            }
            match update_info {
                Some(info) => {
                    println!("update available: {}", info.version);
                    println!("{}", info.release_notes);
                    println!("download: {}", info.download_url);
                }
                None => println!("update available"),
            }
            Some(0)
        }
        _ => None,
    })
}

fn download(bridge: &Bridge, config: &AtelierConfig) -> u8 {
    let collector = Collector::new();
    let _progress = collector.watch(bridge, EventKind::UpdateProgress);
    let _done = collector.watch(bridge, EventKind::UpdateDownloaded);

    if let Err(e) = bridge.download_update() {
        return send_failed("update download", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::UpdateProgress { progress } => {
            println!("downloading... {progress}%");
            None
        }
        HostEvent::UpdateDownloaded { success, message } => {
            println!("{message}");
            Some(u8::from(!success))
        }
        _ => None,
    })
}

pub(super) fn setup(bridge: &Bridge, config: &AtelierConfig) -> u8 {
    let collector = Collector::new();
    let _progress = collector.watch(bridge, EventKind::InstallProgress);
    let _done = collector.watch(bridge, EventKind::InstallComplete);

    if let Err(e) = bridge.auto_install() {
        return send_failed("setup", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::InstallProgress { progress, message } => {
            println!("[{progress:>3}%] {message}");
            None
        }
        HostEvent::InstallComplete { message } => {
            println!("{message}");
            Some(0)
        }
        _ => None,
    })
}
