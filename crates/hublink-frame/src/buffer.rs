use bytes::{Buf, Bytes, BytesMut};
use tracing::warn;

use crate::codec::DELIMITER;
use crate::error::{FrameError, Result};

/// Default maximum size of one raw frame: 64 KiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Configuration for stream deframing.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum raw frame size in bytes, delimiter included. Default: 64 KiB.
    pub max_frame_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Splits a byte stream into delimiter-terminated frames.
///
/// Serial ports hand out whatever bytes happen to be available, so a single
/// read may hold half a frame or several frames. Push bytes as they arrive
/// and pull complete raw frames (delimiter included) ready for
/// [`unpack`](crate::codec::unpack).
#[derive(Debug)]
pub struct FrameBuffer {
    buf: BytesMut,
    config: FrameConfig,
    discarding: bool,
}

impl FrameBuffer {
    /// Create a frame buffer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a frame buffer with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            discarding: false,
        }
    }

    /// Append received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Take the next complete frame from the buffer.
    ///
    /// Returns `Ok(None)` when no complete frame is buffered yet. When the
    /// pending bytes exceed the configured maximum, `FrameTooLarge` is
    /// returned once and the oversized frame is skipped up to its delimiter.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        take_frame(&mut self.buf, &mut self.discarding, self.config.max_frame_size)
    }

    /// Push bytes and collect every frame completed by them.
    ///
    /// Oversized frames are logged and skipped.
    pub fn push(&mut self, data: &[u8]) -> Vec<Bytes> {
        self.extend(data);
        let mut frames = Vec::new();
        loop {
            match self.next_frame() {
                Ok(Some(frame)) => frames.push(frame),
                Ok(None) => return frames,
                Err(err) => warn!(error = %err, "skipping frame"),
            }
        }
    }

    /// Take whatever is buffered without a terminating delimiter.
    pub fn take_remaining(&mut self) -> Bytes {
        self.discarding = false;
        self.buf.split().freeze()
    }

    /// Number of buffered bytes not yet returned as a frame.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Current configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split the next delimiter-terminated frame off `buf`.
///
/// `discarding` is set while the tail of an oversized frame is being skipped.
pub(crate) fn take_frame(
    buf: &mut BytesMut,
    discarding: &mut bool,
    max_frame_size: usize,
) -> Result<Option<Bytes>> {
    loop {
        let Some(end) = buf.iter().position(|&byte| byte == DELIMITER) else {
            if *discarding {
                buf.clear();
            } else if buf.len() > max_frame_size {
                let size = buf.len();
                buf.clear();
                *discarding = true;
                return Err(FrameError::FrameTooLarge {
                    size,
                    max: max_frame_size,
                });
            }
            return Ok(None);
        };

        if *discarding {
            buf.advance(end + 1);
            *discarding = false;
            continue;
        }

        let frame = buf.split_to(end + 1).freeze();
        if frame.len() > max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: frame.len(),
                max: max_frame_size,
            });
        }
        return Ok(Some(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{pack, unpack};

    #[test]
    fn single_frame() {
        let mut buffer = FrameBuffer::new();
        let frames = buffer.push(&pack(b"hello"));

        assert_eq!(frames.len(), 1);
        assert_eq!(unpack(&frames[0]).unwrap().as_ref(), b"hello");
        assert_eq!(buffer.buffered_len(), 0);
    }

    #[test]
    fn multiple_frames_in_one_read() {
        let mut wire = pack(b"one").to_vec();
        wire.extend_from_slice(&pack(b"two"));
        wire.extend_from_slice(&pack(&[0, 1, 2]));

        let mut buffer = FrameBuffer::new();
        let frames = buffer.push(&wire);

        assert_eq!(frames.len(), 3);
        assert_eq!(unpack(&frames[0]).unwrap().as_ref(), b"one");
        assert_eq!(unpack(&frames[1]).unwrap().as_ref(), b"two");
        assert_eq!(unpack(&frames[2]).unwrap().as_ref(), &[0, 1, 2]);
    }

    #[test]
    fn frame_split_across_reads() {
        let wire = pack(b"fragmented payload");
        let mut buffer = FrameBuffer::new();

        for byte in &wire[..wire.len() - 1] {
            assert!(buffer.push(&[*byte]).is_empty());
        }
        let frames = buffer.push(&wire[wire.len() - 1..]);

        assert_eq!(frames.len(), 1);
        assert_eq!(unpack(&frames[0]).unwrap().as_ref(), b"fragmented payload");
    }

    #[test]
    fn oversized_frame_is_skipped() {
        let cfg = FrameConfig { max_frame_size: 8 };
        let mut buffer = FrameBuffer::with_config(cfg);

        buffer.extend(&[0x41; 16]);
        let err = buffer.next_frame().unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { size: 16, max: 8 }));

        let mut rest = vec![0x41; 4];
        rest.push(DELIMITER);
        rest.extend_from_slice(&pack(b"ok"));
        let frames = buffer.push(&rest);

        assert_eq!(frames.len(), 1);
        assert_eq!(unpack(&frames[0]).unwrap().as_ref(), b"ok");
    }

    #[test]
    fn complete_oversized_frame_is_reported() {
        let cfg = FrameConfig { max_frame_size: 4 };
        let mut buffer = FrameBuffer::with_config(cfg);

        buffer.extend(&pack(b"too long"));
        assert!(matches!(
            buffer.next_frame(),
            Err(FrameError::FrameTooLarge { max: 4, .. })
        ));
        assert!(buffer.next_frame().unwrap().is_none());
    }

    #[test]
    fn take_remaining_returns_partial_frame() {
        let mut buffer = FrameBuffer::new();
        assert!(buffer.push(&[0x10, 0x11]).is_empty());
        assert_eq!(buffer.take_remaining().as_ref(), &[0x10, 0x11]);
        assert_eq!(buffer.buffered_len(), 0);
    }
}
