use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::buffer::{take_frame, FrameConfig};
use crate::codec::pack;
use crate::error::{FrameError, Result};

/// `tokio_util` codec for hub frames.
///
/// Decoding yields raw frames (delimiter included) without unpacking them, so
/// a corrupt frame never tears down the stream; the caller unpacks and decides
/// what to do with codec failures. Encoding packs a payload into a frame.
#[derive(Debug, Clone, Default)]
pub struct HubCodec {
    config: FrameConfig,
    discarding: bool,
}

impl HubCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            config,
            discarding: false,
        }
    }
}

impl Decoder for HubCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        loop {
            match take_frame(src, &mut self.discarding, self.config.max_frame_size) {
                Err(FrameError::FrameTooLarge { size, max }) => {
                    warn!(size, max, "skipping oversized frame");
                }
                other => return other,
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if !src.is_empty() {
            warn!(len = src.len(), "discarding unterminated bytes at end of stream");
            src.clear();
        }
        Ok(None)
    }
}

impl Encoder<&[u8]> for HubCodec {
    type Error = FrameError;

    fn encode(&mut self, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
        dst.extend_from_slice(&pack(payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{unpack, DELIMITER};

    #[test]
    fn encode_then_decode() {
        let mut codec = HubCodec::new();
        let mut wire = BytesMut::new();

        codec.encode(&b"first"[..], &mut wire).unwrap();
        codec.encode(&[0u8, 1, 2][..], &mut wire).unwrap();

        let first = codec.decode(&mut wire).unwrap().unwrap();
        let second = codec.decode(&mut wire).unwrap().unwrap();

        assert_eq!(unpack(&first).unwrap().as_ref(), b"first");
        assert_eq!(unpack(&second).unwrap().as_ref(), &[0, 1, 2]);
        assert!(codec.decode(&mut wire).unwrap().is_none());
    }

    #[test]
    fn incomplete_frame_waits() {
        let mut codec = HubCodec::new();
        let mut wire = BytesMut::from(&pack(b"partial")[..4]);
        assert!(codec.decode(&mut wire).unwrap().is_none());
        assert_eq!(wire.len(), 4);
    }

    #[test]
    fn oversized_frame_does_not_end_stream() {
        let mut codec = HubCodec::with_config(FrameConfig { max_frame_size: 6 });
        let mut wire = BytesMut::from(&[0x41u8; 10][..]);
        assert!(codec.decode(&mut wire).unwrap().is_none());

        wire.extend_from_slice(&[0x41, DELIMITER]);
        wire.extend_from_slice(&pack(b"ok"));
        let frame = codec.decode(&mut wire).unwrap().unwrap();
        assert_eq!(unpack(&frame).unwrap().as_ref(), b"ok");
    }

    #[test]
    fn eof_discards_unterminated_tail() {
        let mut codec = HubCodec::new();
        let mut wire = BytesMut::from(&[0x10u8, 0x11][..]);
        assert!(codec.decode_eof(&mut wire).unwrap().is_none());
        assert!(wire.is_empty());
    }
}
