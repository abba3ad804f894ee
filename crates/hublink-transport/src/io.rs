use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// [`Transport`] over any tokio byte stream.
///
/// Works for serial port handles, pipes to a BLE bridge process, or sockets.
/// Each `write_bytes` call writes the whole fragment and flushes before it
/// returns; concurrent callers are serialized.
pub struct IoTransport<W> {
    inner: Mutex<W>,
}

impl<W> IoTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap a writable stream.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W> Transport for IoTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let mut offset = 0usize;
        while offset < bytes.len() {
            match inner.write(&bytes[offset..]).await {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        inner.flush().await?;
        trace!(len = bytes.len(), "fragment written");
        Ok(())
    }
}

impl<W> std::fmt::Debug for IoTransport<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoTransport").finish_non_exhaustive()
    }
}
