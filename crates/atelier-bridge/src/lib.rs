//! The atelier message bridge.
//!
//! One [`Bridge`] per process connects UI-side callers to the privileged
//! host process over a serialized-message channel. Outbound [`Request`]s
//! queue until the transport is ready, then flush FIFO; inbound
//! [`HostEvent`]s are decoded and dispatched to subscribers in registration
//! order via [`Bridge::pump`]. The transport behind the bridge is a
//! capability chosen once at construction: a live WebSocket channel to the
//! host, or the canned-reply stub when no host answers.
//!
//! [`Request`]: atelier_protocol::Request
//! [`HostEvent`]: atelier_protocol::HostEvent

pub mod bridge;
pub mod error;
pub mod registry;
pub mod transport;

mod requests;

pub use bridge::{Bridge, Subscription};
pub use error::{BridgeError, TransportError};
pub use registry::{Handler, HandlerId};
pub use transport::{ConnectOptions, StubTimings, Transport, TransportEvent, TransportMode};

pub type Result<T> = std::result::Result<T, BridgeError>;
