//! `atelier info` — the host's system inventory.

use atelier_bridge::Bridge;
use atelier_config::AtelierConfig;
use atelier_protocol::{EventKind, HostEvent};

use super::{await_events, send_failed, Collector};

pub(super) fn info(bridge: &Bridge, config: &AtelierConfig) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::SystemInfo);

    if let Err(e) = bridge.get_system_info() {
        return send_failed("info", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::SystemInfo {
            os,
            architecture,
            cpu,
            cores,
            ram,
        } => {
            println!("os:           {os}");
            println!("architecture: {architecture}");
            println!("cpu:          {cpu}");
            println!("cores:        {cores}");
            println!("ram:          {ram}");
            Some(0)
        }
        _ => None,
    })
}
