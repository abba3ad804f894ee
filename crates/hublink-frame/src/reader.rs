use bytes::Bytes;
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::buffer::FrameConfig;
use crate::error::Result;
use crate::framed::HubCodec;

/// Reads raw frames from any tokio byte stream.
///
/// Handles partial reads internally; callers always get complete
/// delimiter-terminated frames, ready for [`unpack`](crate::codec::unpack).
pub struct FrameReader<R> {
    inner: FramedRead<R, HubCodec>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a frame reader with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a frame reader with explicit configuration.
    pub fn with_config(inner: R, config: FrameConfig) -> Self {
        Self {
            inner: FramedRead::new(inner, HubCodec::with_config(config)),
        }
    }

    /// Read the next raw frame.
    ///
    /// Returns `Ok(None)` once the stream reaches EOF.
    pub async fn read_frame(&mut self) -> Result<Option<Bytes>> {
        self.inner.next().await.transpose()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R> std::fmt::Debug for FrameReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader").finish_non_exhaustive()
    }
}
