//! Host-side communication core for programmable robotics hubs.
//!
//! hublink talks to a hub over BLE or serial: self-synchronizing byte
//! stuffing, a tagged binary message catalog, request/response correlation,
//! and chunked program upload with CRC32 checks.
//!
//! # Crate Structure
//!
//! - [`transport`]: write side of a link (`Transport`, tokio `AsyncWrite` adapter)
//! - [`frame`]: byte-stuffing codec and stream deframing
//! - [`proto`]: message catalog keyed by tag byte
//! - [`client`]: correlation engine, uploads and program control

/// Re-export transport types.
pub mod transport {
    pub use hublink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use hublink_frame::*;
}

/// Re-export message catalog types.
pub mod proto {
    pub use hublink_proto::*;
}

/// Re-export client types.
pub mod client {
    pub use hublink_client::*;
}
