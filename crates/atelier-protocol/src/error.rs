#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("failed to serialize message: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to deserialize frame: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("unrecognized message kind: {kind}")]
    UnrecognizedKind { kind: String },

    #[error("invalid payload for '{kind}': {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
