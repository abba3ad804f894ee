use std::future::Future;
use std::sync::Arc;

use crate::error::Result;

/// Write side of a hub connection.
///
/// Implementations back this with a BLE characteristic write (with response)
/// or a serial port write followed by a drain. The returned future must only
/// complete once the bytes have left the host, so callers can await each
/// fragment before issuing the next one.
pub trait Transport: Send + Sync {
    /// Write one fragment to the device.
    fn write_bytes(&self, bytes: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn write_bytes(&self, bytes: &[u8]) -> impl Future<Output = Result<()>> + Send {
        (**self).write_bytes(bytes)
    }
}
