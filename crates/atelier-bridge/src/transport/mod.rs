//! Transport capability: the channel carrying encoded envelopes.
//!
//! Two implementations exist. [`WebSocketTransport`] talks to a live host
//! process; [`StubTransport`] answers designated requests with canned
//! replies when no host is around. The bridge picks one at construction and
//! never branches on the choice again.

pub mod stub;
pub mod websocket;

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::error::TransportError;

pub use stub::{StubTimings, StubTransport};
pub use websocket::WebSocketTransport;

/// What a transport pushes to its bridge's inbox.
#[derive(Debug)]
pub enum TransportEvent {
    /// The channel is operational; queued sends may flush.
    Opened,
    /// One raw inbound frame.
    Frame(String),
    /// The session ended; no further frames will arrive.
    Closed { reason: String },
}

/// Which transport construction selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Live channel to the host process.
    Host,
    /// Canned replies; development only.
    Stub,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportMode::Host => "host",
            TransportMode::Stub => "stub",
        })
    }
}

/// A channel that carries encoded envelope frames toward the host.
///
/// Inbound traffic flows through the [`TransportEvent`] sender handed to the
/// implementation at construction. `transmit` hands a frame to the channel
/// and must not block on the network.
pub trait Transport: Send {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Queue one encoded frame for delivery.
    fn transmit(&mut self, frame: &str) -> Result<(), TransportError>;
}

/// Connection settings, typically mapped from the `[host]` and `[stub]`
/// config sections.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Host endpoint to probe. `None` skips detection and goes straight to
    /// the stub.
    pub host_url: Option<String>,
    /// How long the probe may take before the stub takes over.
    pub connect_timeout: Duration,
    pub stub: StubTimings,
}

/// Probe for a live host channel, falling back to the stub when none
/// answers. Returns the transport, the inbox it will deliver into, and
/// which mode won.
pub fn detect(options: &ConnectOptions) -> (Box<dyn Transport>, Receiver<TransportEvent>, TransportMode) {
    let (tx, rx): (Sender<TransportEvent>, Receiver<TransportEvent>) = mpsc::channel();

    if let Some(url) = options.host_url.as_deref() {
        match WebSocketTransport::connect(url, options.connect_timeout, tx.clone()) {
            Ok(transport) => {
                tracing::info!(%url, "connected to host channel");
                return (Box::new(transport), rx, TransportMode::Host);
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "no host channel detected, using stub transport");
            }
        }
    } else {
        tracing::info!("host detection disabled, using stub transport");
    }

    let stub = StubTransport::spawn(tx, options.stub.clone());
    (Box::new(stub), rx, TransportMode::Stub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_without_a_url_selects_the_stub() {
        let options = ConnectOptions {
            host_url: None,
            connect_timeout: Duration::from_millis(50),
            stub: StubTimings::default(),
        };
        let (transport, _rx, mode) = detect(&options);
        assert_eq!(mode, TransportMode::Stub);
        assert_eq!(transport.name(), "stub");
    }

    #[test]
    fn detection_against_a_dead_endpoint_falls_back() {
        let options = ConnectOptions {
            // Port 9 (discard) is about as dead as a local endpoint gets.
            host_url: Some("ws://127.0.0.1:9/bridge".into()),
            connect_timeout: Duration::from_millis(250),
            stub: StubTimings::default(),
        };
        let (_transport, _rx, mode) = detect(&options);
        assert_eq!(mode, TransportMode::Stub);
    }

    #[test]
    fn mode_display_names() {
        assert_eq!(TransportMode::Host.to_string(), "host");
        assert_eq!(TransportMode::Stub.to_string(), "stub");
    }
}
