//! Byte-stuffing frame codec for hub links.
//!
//! Every message sent to or received from the hub travels as one frame:
//! - the payload is byte-stuffed so that neither `0x00` nor the delimiter
//!   `0x02` appears inside it (blocks of at most 84 bytes, one code byte each)
//! - every stuffed byte is XORed with `0x03`
//! - a single `0x02` terminates the frame
//!
//! [`FrameBuffer`] splits an arbitrary byte stream back into frames.

pub mod buffer;
pub mod codec;
pub mod error;

#[cfg(feature = "async")]
pub mod framed;
#[cfg(feature = "async")]
pub mod reader;

pub use buffer::{FrameBuffer, FrameConfig, DEFAULT_MAX_FRAME_SIZE};
pub use codec::{
    decode, encode, pack, unpack, DELIMITER, ESCAPE, MAX_BLOCK_SIZE, NO_DELIMITER, XOR_MASK,
};
pub use error::{FrameError, Result};

#[cfg(feature = "async")]
pub use framed::HubCodec;
#[cfg(feature = "async")]
pub use reader::FrameReader;
