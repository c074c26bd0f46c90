//! Canned-reply transport for running without a host process.
//!
//! Development only. Accepts every frame; a designated few get the replies
//! the real host would send, pushed from a timer thread. Everything in stub
//! operation lives in this module; deleting it touches nothing outside
//! `transport`.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use atelier_protocol::{Envelope, HostEvent};

use super::{Transport, TransportEvent};
use crate::error::TransportError;

/// Timings for the stub's replies, mapped from the `[stub]` config section.
#[derive(Debug, Clone)]
pub struct StubTimings {
    /// Delay before the spontaneous `systemInfo` announcement.
    pub announce_delay: Duration,
    /// Base reply delay; the scripted build sequence scales from it, so
    /// tests can compress the whole script by shrinking this.
    pub reply_delay: Duration,
}

impl Default for StubTimings {
    fn default() -> Self {
        Self {
            announce_delay: Duration::from_millis(500),
            reply_delay: Duration::from_millis(100),
        }
    }
}

/// The fictional machine the stub reports, recognizably canned.
fn canned_system_info() -> HostEvent {
    HostEvent::SystemInfo {
        os: "Windows 11 (Build 22000)".into(),
        architecture: "x64".into(),
        cpu: "Intel Core i7-10700K".into(),
        cores: 8,
        ram: "16384 MB".into(),
    }
}

pub struct StubTransport {
    events: Sender<TransportEvent>,
    timings: StubTimings,
}

impl StubTransport {
    /// Create the stub, emit `Opened` immediately, and schedule the
    /// spontaneous `systemInfo` announcement.
    pub fn spawn(events: Sender<TransportEvent>, timings: StubTimings) -> Self {
        let _ = events.send(TransportEvent::Opened);

        let announce = events.clone();
        let delay = timings.announce_delay;
        thread::spawn(move || {
            thread::sleep(delay);
            push_reply(&announce, &canned_system_info());
        });

        Self { events, timings }
    }

    /// Deliver `steps` at their offsets from now, in order, off-thread.
    fn reply_later(&self, steps: Vec<(Duration, HostEvent)>) {
        let events = self.events.clone();
        thread::spawn(move || {
            let mut elapsed = Duration::ZERO;
            for (at, event) in steps {
                thread::sleep(at.saturating_sub(elapsed));
                elapsed = at;
                push_reply(&events, &event);
            }
        });
    }
}

fn push_reply(events: &Sender<TransportEvent>, event: &HostEvent) {
    match event.to_frame() {
        // The bridge may be gone by the time a timer fires; that is fine.
        Ok(frame) => {
            let _ = events.send(TransportEvent::Frame(frame));
        }
        Err(e) => tracing::warn!(error = %e, "stub failed to encode reply"),
    }
}

impl Transport for StubTransport {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn transmit(&mut self, frame: &str) -> Result<(), TransportError> {
        let kind = Envelope::from_json(frame)
            .map(|envelope| envelope.kind)
            .unwrap_or_default();
        let unit = self.timings.reply_delay;

        match kind.as_str() {
            "getSystemInfo" => self.reply_later(vec![(unit, canned_system_info())]),
            "build" => self.reply_later(vec![
                (
                    unit,
                    HostEvent::BuildLog {
                        message: "[INFO] Starting compilation...\n".into(),
                    },
                ),
                (
                    unit * 3,
                    HostEvent::BuildLog {
                        message: "[CMD] g++ test.cpp -o test.exe -std=c++17\n".into(),
                    },
                ),
                (
                    unit * 8,
                    HostEvent::BuildLog {
                        message: "[SUCCESS] Compilation completed successfully\n".into(),
                    },
                ),
                (
                    unit * 10,
                    HostEvent::BuildComplete {
                        success: true,
                        message: "Build completed successfully".into(),
                        output_file: Some("test.exe".into()),
                    },
                ),
            ]),
            other => {
                tracing::debug!(kind = other, "stub accepted frame with no scripted reply");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_protocol::Request;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Instant;

    fn fast_stub() -> (StubTransport, Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel();
        let stub = StubTransport::spawn(
            tx,
            StubTimings {
                // Keep the announcement out of the way.
                announce_delay: Duration::from_secs(60),
                reply_delay: Duration::from_millis(5),
            },
        );
        (stub, rx)
    }

    fn collect_frames(rx: &Receiver<TransportEvent>, count: usize) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut frames = Vec::new();
        while frames.len() < count && Instant::now() < deadline {
            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(TransportEvent::Frame(frame)) => frames.push(frame),
                Ok(_) => {}
                Err(_) => {}
            }
        }
        frames
    }

    #[test]
    fn opens_immediately() {
        let (_stub, rx) = fast_stub();
        assert!(matches!(rx.try_recv(), Ok(TransportEvent::Opened)));
    }

    #[test]
    fn announces_system_info_after_the_announce_delay() {
        let (tx, rx) = mpsc::channel();
        let _stub = StubTransport::spawn(
            tx,
            StubTimings {
                announce_delay: Duration::from_millis(5),
                reply_delay: Duration::from_millis(5),
            },
        );
        let frames = collect_frames(&rx, 1);
        let event = HostEvent::from_frame(&frames[0]).unwrap();
        assert!(matches!(event, HostEvent::SystemInfo { .. }));
    }

    #[test]
    fn scripted_build_sequence_arrives_in_order() {
        let (mut stub, rx) = fast_stub();
        stub.transmit(
            &Request::Build {
                source_file: "test.cpp".into(),
                output_file: "test.exe".into(),
                flags: vec![],
            }
            .to_frame()
            .unwrap(),
        )
        .unwrap();

        let frames = collect_frames(&rx, 4);
        assert_eq!(frames.len(), 4);

        let events: Vec<HostEvent> = frames
            .iter()
            .map(|frame| HostEvent::from_frame(frame).unwrap())
            .collect();
        for event in &events[..3] {
            assert!(matches!(event, HostEvent::BuildLog { .. }), "{event:?}");
        }
        match &events[3] {
            HostEvent::BuildComplete {
                success,
                output_file,
                ..
            } => {
                assert!(*success);
                assert_eq!(output_file.as_deref(), Some("test.exe"));
            }
            other => panic!("script did not end with buildComplete: {other:?}"),
        }
    }

    #[test]
    fn undesignated_kinds_produce_no_reply() {
        let (mut stub, rx) = fast_stub();
        stub.transmit(&Request::ListContainers {}.to_frame().unwrap())
            .unwrap();
        stub.transmit(&Request::CheckDockerHealth {}.to_frame().unwrap())
            .unwrap();

        thread::sleep(Duration::from_millis(100));
        let mut frames = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, TransportEvent::Frame(_)) {
                frames += 1;
            }
        }
        assert_eq!(frames, 0);
    }
}
