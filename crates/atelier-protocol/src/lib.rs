//! Wire protocol for the atelier bridge.
//!
//! Every frame crossing the UI/host boundary is a two-field JSON envelope,
//! `{"type": ..., "data": ...}`. This crate defines the raw [`Envelope`],
//! the typed vocabulary spoken over it ([`Request`] outbound, [`HostEvent`]
//! inbound), and the [`EventKind`] key the bridge dispatches on. Payloads
//! are validated here, at the boundary; nothing downstream handles untyped
//! JSON.

pub mod envelope;
pub mod error;
pub mod event;
pub mod request;

pub use envelope::Envelope;
pub use error::ProtocolError;
pub use event::{
    ContainerSummary, DirEntry, EntryKind, EventKind, HostEvent, PluginSummary, SearchResult,
    UpdateInfo,
};
pub use request::Request;

pub type Result<T> = std::result::Result<T, ProtocolError>;
