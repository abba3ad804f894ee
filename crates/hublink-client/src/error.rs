use std::time::Duration;

use hublink_proto::MessageKind;

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] hublink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] hublink_frame::FrameError),

    /// Message encoding or decoding error.
    #[error("protocol error: {0}")]
    Proto(#[from] hublink_proto::ProtoError),

    /// No response arrived in time. The request was withdrawn.
    #[error("no {kind} within {after:?}")]
    Timeout { kind: MessageKind, after: Duration },

    /// The connection closed while the request was pending.
    #[error("connection closed before a response arrived")]
    ConnectionClosed,

    /// A response of the wrong shape was correlated to the request.
    #[error("expected {expected}, got {actual}")]
    UnexpectedResponse {
        expected: MessageKind,
        actual: MessageKind,
    },

    /// The operation needs device info that has not been negotiated yet.
    #[error("hub parameters not negotiated (send an InfoRequest first)")]
    NotNegotiated,

    /// The negotiated chunk size cannot carry any data.
    #[error("invalid chunk size {0}")]
    InvalidChunkSize(usize),

    /// The hub answered with a non-zero status.
    #[error("{kind} not acknowledged (status 0x{status:02x})")]
    Nack { kind: MessageKind, status: u8 },

    /// The hub refused to start an upload.
    #[error("hub refused upload of {file_name} to slot {slot} (status 0x{status:02x})")]
    UploadRejected {
        file_name: String,
        slot: u8,
        status: u8,
    },

    /// The hub rejected one chunk of an upload. Nothing after it was sent.
    #[error("chunk {index} at offset {offset} rejected (status 0x{status:02x})")]
    ChunkRejected {
        index: usize,
        offset: usize,
        status: u8,
    },

    /// The program could not be compiled before upload.
    #[error("compilation failed with status {status}")]
    CompileFailed { status: i32, diagnostics: Vec<String> },
}

pub type Result<T> = std::result::Result<T, HubError>;
