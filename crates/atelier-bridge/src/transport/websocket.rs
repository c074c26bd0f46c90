//! Live host channel: a single-session WebSocket client.
//!
//! The session runs on a dedicated one-worker tokio runtime owned by the
//! transport. Outbound frames flow through an unbounded channel into the
//! socket sink; inbound text frames flow into the bridge's inbox. A closed
//! or errored socket ends the session with a `Closed` event; this layer
//! never reconnects.

use std::sync::mpsc::Sender;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc as tokio_mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::{Transport, TransportEvent};
use crate::error::TransportError;

pub struct WebSocketTransport {
    outbound: tokio_mpsc::UnboundedSender<String>,
    /// Keeps the session task alive for the life of the transport.
    _runtime: tokio::runtime::Runtime,
}

impl WebSocketTransport {
    /// Open a WebSocket to `url`, bounded by `timeout`. Blocks the caller
    /// for the handshake only; after that all socket traffic happens on the
    /// transport's own runtime.
    pub fn connect(
        url: &str,
        timeout: Duration,
        events: Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| TransportError::Runtime(e.to_string()))?;

        // The timeout future must be built inside the runtime; its timer
        // registers with the reactor at construction, not at first poll.
        let (ws, _response) = runtime
            .block_on(async { tokio::time::timeout(timeout, connect_async(url)).await })
            .map_err(|_| {
                TransportError::Connect(format!("timed out after {} ms", timeout.as_millis()))
            })?
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let (outbound_tx, outbound_rx) = tokio_mpsc::unbounded_channel();
        runtime.spawn(session(ws, outbound_rx, events));

        Ok(Self {
            outbound: outbound_tx,
            _runtime: runtime,
        })
    }
}

impl Transport for WebSocketTransport {
    fn name(&self) -> &'static str {
        "websocket"
    }

    fn transmit(&mut self, frame: &str) -> Result<(), TransportError> {
        self.outbound
            .send(frame.to_owned())
            .map_err(|_| TransportError::Closed)
    }
}

/// Forwarding loop for one socket session.
async fn session(
    ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    mut outbound: tokio_mpsc::UnboundedReceiver<String>,
    events: Sender<TransportEvent>,
) {
    let (mut sink, mut stream) = ws.split();
    let _ = events.send(TransportEvent::Opened);

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                match frame {
                    Some(text) => {
                        if let Err(e) = sink.send(Message::Text(text.into())).await {
                            let _ = events.send(TransportEvent::Closed {
                                reason: format!("send failed: {e}"),
                            });
                            return;
                        }
                    }
                    // Transport dropped; close the socket and end the session.
                    None => {
                        let _ = sink.close().await;
                        return;
                    }
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let _ = events.send(TransportEvent::Frame(text.to_string()));
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        let _ = events.send(TransportEvent::Closed {
                            reason: "host closed connection".into(),
                        });
                        return;
                    }
                    Some(Err(e)) => {
                        let _ = events.send(TransportEvent::Closed {
                            reason: format!("ws error: {e}"),
                        });
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn connecting_to_a_dead_endpoint_fails() {
        let (tx, _rx) = mpsc::channel();
        let result =
            WebSocketTransport::connect("ws://127.0.0.1:9/bridge", Duration::from_millis(250), tx);
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }

    #[test]
    fn malformed_urls_are_connect_errors() {
        let (tx, _rx) = mpsc::channel();
        let result =
            WebSocketTransport::connect("not a url", Duration::from_millis(250), tx);
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
