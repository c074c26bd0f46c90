//! `atelier docker` — container management through the host.

use atelier_bridge::Bridge;
use atelier_config::AtelierConfig;
use atelier_protocol::{EventKind, HostEvent};

use super::{await_events, dispatched, send_failed, Collector};
use crate::cli::DockerCommand;

pub(super) fn execute(command: DockerCommand, bridge: &Bridge, config: &AtelierConfig) -> u8 {
    match command {
        DockerCommand::Ps => ps(bridge, config),
        DockerCommand::Search { query } => search(bridge, config, query),
        DockerCommand::Logs { id, lines } => logs(bridge, config, id, lines),
        DockerCommand::Start { id } => start(bridge, config, id),
        DockerCommand::Stop { id } => stop(bridge, config, id),
        DockerCommand::Pull { image, tag } => pull(bridge, config, image, tag),
        // The host models no reply for the rest.
        DockerCommand::Restart { id } => dispatched("restart", bridge.restart_container(id)),
        DockerCommand::Rm { id, force } => dispatched("rm", bridge.remove_container(id, force)),
        DockerCommand::Health => dispatched("health", bridge.check_docker_health()),
        DockerCommand::Clean => dispatched("clean", bridge.clean_docker_images()),
    }
}

fn ps(bridge: &Bridge, config: &AtelierConfig) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::ContainerList);

    if let Err(e) = bridge.list_containers() {
        return send_failed("ps", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::ContainerList {
            success,
            containers,
        } => {
            if !success {
                eprintln!("ps: host could not list containers");
                return Some(1);
            }
            println!(
                "{:<14} {:<20} {:<24} {:<16} HEALTHY",
                "ID", "NAME", "IMAGE", "STATUS"
            );
            for c in containers {
                println!(
                    "{:<14} {:<20} {:<24} {:<16} {}",
                    c.id,
                    c.name,
                    c.image,
                    c.status,
                    if c.healthy { "yes" } else { "no" }
                );
            }
            Some(0)
        }
        _ => None,
    })
}

fn search(bridge: &Bridge, config: &AtelierConfig, query: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::ContainerSearchResults);

    if let Err(e) = bridge.search_containers(query) {
        return send_failed("search", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::ContainerSearchResults { success, results } => {
            if !success {
                eprintln!("search: host search failed");
                return Some(1);
            }
            for result in results {
                let mut badges = Vec::new();
                if result.official {
                    badges.push("official");
                }
                if result.verified {
                    badges.push("verified");
                }
                let badges = if badges.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", badges.join(", "))
                };
                println!(
                    "{:<28} ★{:<7} {}{badges}",
                    result.name, result.stars, result.description
                );
            }
            Some(0)
        }
        _ => None,
    })
}

fn logs(bridge: &Bridge, config: &AtelierConfig, id: String, lines: u32) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::ContainerLogs);

    if let Err(e) = bridge.get_container_logs(id, lines) {
        return send_failed("logs", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::ContainerLogs { success, logs } => {
            if !success {
                eprintln!("logs: host could not fetch logs");
                return Some(1);
            }
            print!("{logs}");
            Some(0)
        }
        _ => None,
    })
}

fn start(bridge: &Bridge, config: &AtelierConfig, id: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::ContainerStarted);

    if let Err(e) = bridge.start_container(id) {
        return send_failed("start", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::ContainerStarted { success } => {
            println!("container {}", if success { "started" } else { "failed to start" });
            Some(u8::from(!success))
        }
        _ => None,
    })
}

fn stop(bridge: &Bridge, config: &AtelierConfig, id: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::ContainerStopped);

    if let Err(e) = bridge.stop_container(id) {
        return send_failed("stop", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::ContainerStopped { success } => {
            println!("container {}", if success { "stopped" } else { "failed to stop" });
            Some(u8::from(!success))
        }
        _ => None,
    })
}

fn pull(bridge: &Bridge, config: &AtelierConfig, image: String, tag: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::ImagePulled);

    let name = format!("{image}:{tag}");
    if let Err(e) = bridge.pull_image(image, tag) {
        return send_failed("pull", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::ImagePulled { success } => {
            if success {
                println!("pulled {name}");
                Some(0)
            } else {
                eprintln!("pull: host failed to pull {name}");
                Some(1)
            }
        }
        _ => None,
    })
}
