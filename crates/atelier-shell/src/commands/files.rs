//! `atelier fs` — workspace file operations, executed by the host.

use atelier_bridge::Bridge;
use atelier_config::AtelierConfig;
use atelier_protocol::{EntryKind, EventKind, HostEvent};

use super::{await_events, dispatched, send_failed, Collector};
use crate::cli::FsCommand;

pub(super) fn execute(command: FsCommand, bridge: &Bridge, config: &AtelierConfig) -> u8 {
    match command {
        FsCommand::Ls { path } => ls(bridge, config, path),
        FsCommand::Cat { path } => cat(bridge, config, path),
        FsCommand::Write { path, content } => write(bridge, config, path, content),
        // The host models no reply for these two.
        FsCommand::Mkdir { path } => dispatched("mkdir", bridge.create_directory(path)),
        FsCommand::Rm { path } => dispatched("rm", bridge.delete_file(path)),
    }
}

fn ls(bridge: &Bridge, config: &AtelierConfig, path: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::DirectoryListing);

    if let Err(e) = bridge.list_directory(path) {
        return send_failed("ls", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::DirectoryListing {
            success,
            path,
            files,
        } => {
            if !success {
                eprintln!("ls: host could not list {path}");
                return Some(1);
            }
            println!("{path}:");
            for entry in files {
                let marker = match entry.kind {
                    EntryKind::Folder => "d",
                    EntryKind::File => "-",
                };
                println!("{marker} {}", entry.name);
            }
            Some(0)
        }
        _ => None,
    })
}

fn cat(bridge: &Bridge, config: &AtelierConfig, path: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::FileContent);

    if let Err(e) = bridge.open_file(path) {
        return send_failed("cat", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::FileContent {
            success,
            content,
            path,
        } => {
            if !success {
                eprintln!("cat: host could not read {path}");
                return Some(1);
            }
            print!("{content}");
            Some(0)
        }
        _ => None,
    })
}

fn write(bridge: &Bridge, config: &AtelierConfig, path: String, content: String) -> u8 {
    let collector = Collector::new();
    let _sub = collector.watch(bridge, EventKind::FileSaved);

    if let Err(e) = bridge.save_file(path, content) {
        return send_failed("write", e);
    }

    await_events(bridge, config, &collector, |event| match event {
        HostEvent::FileSaved { success, message } => {
            println!("{message}");
            Some(u8::from(!success))
        }
        _ => None,
    })
}
