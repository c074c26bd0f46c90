//! The bridge service object: readiness gating, queuing, dispatch.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex, Weak};

use atelier_protocol::{EventKind, HostEvent, ProtocolError, Request};

use crate::error::BridgeError;
use crate::registry::{HandlerId, Registry};
use crate::transport::{detect, ConnectOptions, Transport, TransportEvent, TransportMode};

struct Shared {
    /// Permanent once true; a later transport loss does not clear it.
    ready: AtomicBool,
    /// Encoded frames awaiting readiness. Lock order: pending, then
    /// transport. Sends transmit under this lock so nothing can slip in
    /// ahead of a flush in progress.
    pending: Mutex<VecDeque<String>>,
    registry: Mutex<Registry>,
    transport: Mutex<Box<dyn Transport>>,
    inbox: Mutex<Receiver<TransportEvent>>,
    mode: TransportMode,
}

/// Cross-process message channel between the UI side and the host process.
///
/// Cheap to clone (a handle over shared state); construct exactly one per
/// process and pass it to whoever needs it. Handlers run only inside
/// [`Bridge::pump`], on the calling thread, and may reenter the bridge
/// freely.
#[derive(Clone)]
pub struct Bridge {
    shared: Arc<Shared>,
}

impl Bridge {
    /// Detect a live host channel per `options`, falling back to the stub
    /// transport when none answers. The returned bridge is ready either way.
    pub fn connect(options: &ConnectOptions) -> Self {
        let (transport, inbox, mode) = detect(options);
        let bridge = Self::assemble(transport, inbox, mode);
        bridge.mark_ready();
        bridge
    }

    /// Wire an arbitrary transport without marking the bridge ready.
    ///
    /// Readiness then arrives from the transport's `Opened` event or an
    /// explicit [`Bridge::mark_ready`]. This is the seam for embeddings
    /// whose channel comes up late, and for tests.
    pub fn with_transport(transport: Box<dyn Transport>, inbox: Receiver<TransportEvent>) -> Self {
        Self::assemble(transport, inbox, TransportMode::Host)
    }

    fn assemble(
        transport: Box<dyn Transport>,
        inbox: Receiver<TransportEvent>,
        mode: TransportMode,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                ready: AtomicBool::new(false),
                pending: Mutex::new(VecDeque::new()),
                registry: Mutex::new(Registry::new()),
                transport: Mutex::new(transport),
                inbox: Mutex::new(inbox),
                mode,
            }),
        }
    }

    /// Which transport construction selected. Stub operation is always
    /// distinguishable from a live host channel.
    pub fn mode(&self) -> TransportMode {
        self.shared.mode
    }

    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::SeqCst)
    }

    /// Transition to ready and flush the pending queue in FIFO order.
    ///
    /// Idempotent; only the first call flushes. A queued frame whose
    /// transmit fails is logged and dropped, and the flush continues.
    pub fn mark_ready(&self) {
        let mut pending = self.shared.pending.lock().unwrap();
        if self.shared.ready.swap(true, Ordering::SeqCst) {
            return;
        }
        let queued = pending.len();
        let mut transport = self.shared.transport.lock().unwrap();
        while let Some(frame) = pending.pop_front() {
            if let Err(e) = transport.transmit(&frame) {
                tracing::warn!(error = %e, "dropping queued frame, transmit failed during flush");
            }
        }
        tracing::info!(transport = transport.name(), flushed = queued, "bridge ready");
    }

    /// Send one request to the host.
    ///
    /// Encodes the frame immediately, then either transmits (ready) or
    /// appends to the pending queue (not ready). Fire-and-forget: no
    /// delivery acknowledgment exists at this layer, and a transport-level
    /// transmit failure is the only error a ready send can surface.
    pub fn send(&self, request: &Request) -> Result<(), BridgeError> {
        let frame = request.to_frame()?;
        let mut pending = self.shared.pending.lock().unwrap();
        if self.shared.ready.load(Ordering::SeqCst) {
            tracing::debug!(kind = request.kind(), "transmitting request");
            let mut transport = self.shared.transport.lock().unwrap();
            transport.transmit(&frame)?;
            Ok(())
        } else {
            pending.push_back(frame);
            tracing::debug!(
                kind = request.kind(),
                queued = pending.len(),
                "transport not ready, request queued"
            );
            Ok(())
        }
    }

    /// Register `handler` for events of `kind`, after any existing
    /// registrations. The same closure may be registered any number of
    /// times; each registration is independently removable.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&HostEvent) + Send + Sync + 'static,
    {
        let id = self
            .shared
            .registry
            .lock()
            .unwrap()
            .register(kind, Arc::new(handler));
        Subscription {
            shared: Arc::downgrade(&self.shared),
            kind,
            id,
        }
    }

    /// Remove one registration by id. Absent ids are a no-op.
    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        self.shared.registry.lock().unwrap().remove(kind, id)
    }

    /// Drain the transport inbox on the calling thread, dispatching each
    /// decoded event to its subscribers. Returns the number of events
    /// dispatched.
    ///
    /// Undecodable frames are logged and discarded; they never desynchronize
    /// the frames after them.
    pub fn pump(&self) -> usize {
        let mut dispatched = 0;
        loop {
            let next = self.shared.inbox.lock().unwrap().try_recv();
            match next {
                Ok(TransportEvent::Opened) => self.mark_ready(),
                Ok(TransportEvent::Frame(raw)) => match HostEvent::from_frame(&raw) {
                    Ok(event) => {
                        self.dispatch(&event);
                        dispatched += 1;
                    }
                    Err(ProtocolError::UnrecognizedKind { kind }) => {
                        tracing::debug!(%kind, "dropping frame of unrecognized kind");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping undecodable frame");
                    }
                },
                Ok(TransportEvent::Closed { reason }) => {
                    tracing::warn!(%reason, "transport session closed");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        dispatched
    }

    /// Route one event to its handlers, in registration order.
    ///
    /// Iterates a snapshot of the handler list, so handlers may mutate the
    /// registry mid-pass; each id is re-checked against the live registry
    /// before invocation, so an entry removed earlier in the pass is
    /// skipped. A panicking handler is caught and logged, and the rest of
    /// the snapshot still runs.
    fn dispatch(&self, event: &HostEvent) {
        let kind = event.kind();
        let snapshot = self.shared.registry.lock().unwrap().snapshot(kind);
        if snapshot.is_empty() {
            tracing::trace!(%kind, "no subscribers, event dropped");
            return;
        }
        for (id, handler) in snapshot {
            if !self.shared.registry.lock().unwrap().contains(kind, id) {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                tracing::error!(%kind, handler = id.0, "handler panicked during dispatch");
            }
        }
    }
}

/// Capability to undo exactly one [`Bridge::on`] registration.
///
/// Holds a weak handle, so outliving the bridge is harmless. Dropping a
/// subscription leaves the handler registered; UI components that listen
/// for their whole lifetime never need to keep it.
pub struct Subscription {
    shared: Weak<Shared>,
    kind: EventKind,
    id: HandlerId,
}

impl Subscription {
    /// Remove the registration if it is still present. Idempotent; the
    /// second call returns false.
    pub fn unsubscribe(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.registry.lock().unwrap().remove(self.kind, self.id),
            None => false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::{StubTimings, TransportEvent};
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc::{self, Sender};
    use std::time::{Duration, Instant};

    /// Records every transmitted frame; can be told to fail N transmits.
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<String>>>,
        fail_next: Arc<AtomicUsize>,
    }

    impl Transport for RecordingTransport {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn transmit(&mut self, frame: &str) -> Result<(), TransportError> {
            if self
                .fail_next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(TransportError::Closed);
            }
            self.sent.lock().unwrap().push(frame.to_string());
            Ok(())
        }
    }

    struct Harness {
        bridge: Bridge,
        sent: Arc<Mutex<Vec<String>>>,
        fail_next: Arc<AtomicUsize>,
        inbox_tx: Sender<TransportEvent>,
    }

    fn harness() -> Harness {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let fail_next = Arc::new(AtomicUsize::new(0));
        let transport = RecordingTransport {
            sent: Arc::clone(&sent),
            fail_next: Arc::clone(&fail_next),
        };
        Harness {
            bridge: Bridge::with_transport(Box::new(transport), inbox_rx),
            sent,
            fail_next,
            inbox_tx,
        }
    }

    fn sent_kinds(sent: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        sent.lock()
            .unwrap()
            .iter()
            .map(|frame| {
                atelier_protocol::Envelope::from_json(frame)
                    .expect("recorded frame is valid")
                    .kind
            })
            .collect()
    }

    fn inbound(tx: &Sender<TransportEvent>, frame: &str) {
        tx.send(TransportEvent::Frame(frame.to_string())).unwrap();
    }

    #[test]
    fn queue_then_flush_preserves_fifo_order() {
        let h = harness();
        assert!(!h.bridge.is_ready());

        h.bridge
            .send(&Request::ListDirectory { path: "/a".into() })
            .unwrap();
        h.bridge
            .send(&Request::CreateDirectory { path: "/b".into() })
            .unwrap();
        assert!(sent_kinds(&h.sent).is_empty());

        h.inbox_tx.send(TransportEvent::Opened).unwrap();
        h.bridge.pump();
        assert!(h.bridge.is_ready());

        h.bridge
            .send(&Request::DeleteFile { path: "/c".into() })
            .unwrap();

        assert_eq!(
            sent_kinds(&h.sent),
            vec!["listDirectory", "createDirectory", "deleteFile"]
        );
    }

    #[test]
    fn ready_send_transmits_immediately_and_surfaces_failure() {
        let h = harness();
        h.bridge.mark_ready();

        h.bridge.send(&Request::GetSystemInfo {}).unwrap();
        assert_eq!(sent_kinds(&h.sent), vec!["getSystemInfo"]);

        h.fail_next.store(1, Ordering::SeqCst);
        let err = h.bridge.send(&Request::GetSystemInfo {}).unwrap_err();
        assert!(matches!(err, BridgeError::Transport(TransportError::Closed)));
    }

    #[test]
    fn flush_failure_drops_the_frame_and_keeps_draining() {
        let h = harness();
        h.bridge.send(&Request::ListContainers {}).unwrap();
        h.bridge.send(&Request::ListPlugins {}).unwrap();

        h.fail_next.store(1, Ordering::SeqCst);
        h.bridge.mark_ready();

        assert_eq!(sent_kinds(&h.sent), vec!["listPlugins"]);
        assert!(h.bridge.is_ready());
    }

    #[test]
    fn mark_ready_is_idempotent() {
        let h = harness();
        h.bridge.mark_ready();
        h.bridge.mark_ready();
        h.bridge.send(&Request::CheckUpdates {}).unwrap();
        assert_eq!(sent_kinds(&h.sent), vec!["checkUpdates"]);
    }

    #[test]
    fn dispatch_invokes_handlers_in_registration_order() {
        let h = harness();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            h.bridge.on(EventKind::RunLog, move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        inbound(
            &h.inbox_tx,
            r#"{"type":"runLog","data":{"message":"out\n"}}"#,
        );
        assert_eq!(h.bridge.pump(), 1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn panicking_handler_does_not_stop_the_rest() {
        let h = harness();
        let hits = Arc::new(AtomicUsize::new(0));

        h.bridge.on(EventKind::SystemInfo, |_| {
            panic!("handler blew up");
        });
        let counted = Arc::clone(&hits);
        h.bridge.on(EventKind::SystemInfo, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        inbound(
            &h.inbox_tx,
            r#"{"type":"systemInfo","data":{"os":"linux","architecture":"x86_64",
                "cpu":"cpu0","cores":4,"ram":"8192 MB"}}"#,
        );
        assert_eq!(h.bridge.pump(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let h = harness();
        let hits = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&hits);
        let sub = h.bridge.on(EventKind::BuildLog, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        let frame = r#"{"type":"buildLog","data":{"message":"hi\n"}}"#;
        inbound(&h.inbox_tx, frame);
        h.bridge.pump();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());

        inbound(&h.inbox_tx, frame);
        h.bridge.pump();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_removed_mid_pass_is_skipped() {
        let h = harness();
        let hits = Arc::new(AtomicUsize::new(0));
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&victim);
        h.bridge.on(EventKind::BuildComplete, move |_| {
            if let Some(sub) = slot.lock().unwrap().take() {
                sub.unsubscribe();
            }
        });
        let counted = Arc::clone(&hits);
        let sub = h.bridge.on(EventKind::BuildComplete, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        *victim.lock().unwrap() = Some(sub);

        inbound(
            &h.inbox_tx,
            r#"{"type":"buildComplete","data":{"success":true,"message":"ok"}}"#,
        );
        h.bridge.pump();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_may_reenter_send() {
        let h = harness();
        h.bridge.mark_ready();

        let reentrant = h.bridge.clone();
        h.bridge.on(EventKind::UpdateCheck, move |_| {
            reentrant.send(&Request::DownloadUpdate {}).unwrap();
        });

        inbound(
            &h.inbox_tx,
            r#"{"type":"updateCheck","data":{"success":true,"updateAvailable":true}}"#,
        );
        h.bridge.pump();
        assert_eq!(sent_kinds(&h.sent), vec!["downloadUpdate"]);
    }

    #[test]
    fn frames_without_subscribers_are_dropped_quietly() {
        let h = harness();
        let hits = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&hits);
        h.bridge.on(EventKind::RunLog, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        inbound(
            &h.inbox_tx,
            r#"{"type":"containerStopped","data":{"success":true}}"#,
        );
        assert_eq!(h.bridge.pump(), 1);

        // The unrelated registry still works afterwards.
        inbound(&h.inbox_tx, r#"{"type":"runLog","data":{"message":"x"}}"#);
        h.bridge.pump();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bad_frames_are_discarded_without_desynchronizing() {
        let h = harness();
        let hits = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&hits);
        h.bridge.on(EventKind::RunComplete, move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });

        inbound(&h.inbox_tx, "{this is not json");
        inbound(&h.inbox_tx, r#"{"type":"teleport","data":{}}"#);
        inbound(&h.inbox_tx, r#"{"type":"runComplete","data":{"success":"yes"}}"#);
        inbound(&h.inbox_tx, r#"{"type":"runComplete","data":{"success":true}}"#);

        assert_eq!(h.bridge.pump(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn connect_falls_back_to_stub_when_the_host_is_dead() {
        // Port 9 (discard) refuses the handshake; detection must come back
        // with the stub instead of unwinding out of connect.
        let options = ConnectOptions {
            host_url: Some("ws://127.0.0.1:9/bridge".into()),
            connect_timeout: Duration::from_millis(250),
            stub: StubTimings {
                announce_delay: Duration::from_secs(60),
                reply_delay: Duration::from_millis(10),
            },
        };
        let bridge = Bridge::connect(&options);
        assert_eq!(bridge.mode(), TransportMode::Stub);
        assert!(bridge.is_ready());
        bridge.send(&Request::GetSystemInfo {}).unwrap();
    }

    #[test]
    fn stub_fallback_answers_get_system_info_end_to_end() {
        let options = ConnectOptions {
            host_url: None,
            connect_timeout: Duration::from_millis(50),
            stub: StubTimings {
                announce_delay: Duration::from_secs(60),
                reply_delay: Duration::from_millis(10),
            },
        };
        let bridge = Bridge::connect(&options);
        assert_eq!(bridge.mode(), TransportMode::Stub);
        assert!(bridge.is_ready());

        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        bridge.on(EventKind::SystemInfo, move |event| {
            if let HostEvent::SystemInfo { os, cpu, .. } = event {
                *sink.lock().unwrap() = Some((os.clone(), cpu.clone()));
            }
        });

        bridge.send(&Request::GetSystemInfo {}).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            bridge.pump();
            if let Some((os, cpu)) = seen.lock().unwrap().clone() {
                assert!(!os.is_empty());
                assert!(!cpu.is_empty());
                break;
            }
            assert!(Instant::now() < deadline, "stub never answered");
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
