use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::kind::MessageKind;
use crate::wire::read_u8;

/// Start or stop the program stored in a slot.
///
/// Wire layout after the tag: `stop(1) | slot(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramFlowRequest {
    pub stop: bool,
    pub slot: u8,
}

impl ProgramFlowRequest {
    pub fn start(slot: u8) -> Self {
        Self { stop: false, slot }
    }

    pub fn stop(slot: u8) -> Self {
        Self { stop: true, slot }
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(u8::from(self.stop));
        dst.put_u8(self.slot);
    }

    pub(crate) fn decode_body(mut body: &[u8]) -> Result<Self> {
        const KIND: MessageKind = MessageKind::ProgramFlowRequest;
        let body = &mut body;
        Ok(Self {
            stop: read_u8(body, KIND, "stop flag")? != 0,
            slot: read_u8(body, KIND, "slot")?,
        })
    }
}

/// Unsolicited: the running program started or stopped.
///
/// Wire layout after the tag: `stopped(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramFlowNotification {
    pub stopped: bool,
}

impl ProgramFlowNotification {
    /// Whether a program is running now.
    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_u8(u8::from(self.stopped));
    }

    pub(crate) fn decode_body(mut body: &[u8]) -> Result<Self> {
        Ok(Self {
            stopped: read_u8(&mut body, MessageKind::ProgramFlowNotification, "stopped flag")?
                != 0,
        })
    }
}
