/// Errors that can occur while writing to a hub transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying stream accepted no bytes (closed by the device or driver).
    #[error("transport closed")]
    Closed,

    /// The transport is not connected to a hub.
    #[error("transport not connected")]
    NotConnected,

    /// Driver-specific failure reported by a transport implementation.
    #[error("transport failure: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
