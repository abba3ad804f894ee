use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::kind::MessageKind;
use crate::wire::read_u8;

/// Shared shape of every acknowledgement: a single status byte, zero = ack.
///
/// Used for `StartFileUploadResponse`, `TransferChunkResponse` and
/// `ProgramFlowResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: u8,
}

impl StatusResponse {
    pub const ACK: u8 = 0x00;

    pub fn ack() -> Self {
        Self { status: Self::ACK }
    }

    pub fn nack(status: u8) -> Self {
        Self { status }
    }

    /// True when the hub accepted the request.
    pub fn is_ack(&self) -> bool {
        self.status == Self::ACK
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(self.status);
    }

    pub(crate) fn decode_body(mut body: &[u8], kind: MessageKind) -> Result<Self> {
        Ok(Self {
            status: read_u8(&mut body, kind, "status")?,
        })
    }
}
