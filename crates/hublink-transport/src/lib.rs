//! Transport abstraction for hub links.
//!
//! The protocol core never talks to a BLE stack or a serial port directly.
//! It only needs somewhere to write bytes; inbound bytes are pushed into the
//! correlation engine by whoever owns the read side.
//!
//! This is the lowest layer of hublink. Everything else builds on top of
//! the [`Transport`] trait provided here.

pub mod error;
pub mod io;
pub mod traits;

pub use error::{Result, TransportError};
pub use io::IoTransport;
pub use traits::Transport;
