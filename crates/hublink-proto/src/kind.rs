use std::fmt;

/// Which side of the link sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Host to hub (requests).
    ToHub,
    /// Hub to host (responses and unsolicited notifications).
    FromHub,
}

/// The closed set of message types, keyed by wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MessageKind {
    InfoRequest = 0x00,
    InfoResponse = 0x01,
    StartFileUploadRequest = 0x0C,
    StartFileUploadResponse = 0x0D,
    TransferChunkRequest = 0x10,
    TransferChunkResponse = 0x11,
    ProgramFlowRequest = 0x1E,
    ProgramFlowResponse = 0x1F,
    ProgramFlowNotification = 0x20,
    ConsoleNotification = 0x21,
}

impl MessageKind {
    /// Every catalog entry, in tag order.
    pub const ALL: [MessageKind; 10] = [
        MessageKind::InfoRequest,
        MessageKind::InfoResponse,
        MessageKind::StartFileUploadRequest,
        MessageKind::StartFileUploadResponse,
        MessageKind::TransferChunkRequest,
        MessageKind::TransferChunkResponse,
        MessageKind::ProgramFlowRequest,
        MessageKind::ProgramFlowResponse,
        MessageKind::ProgramFlowNotification,
        MessageKind::ConsoleNotification,
    ];

    /// Look up a kind by its wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// The wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::InfoRequest => "InfoRequest",
            MessageKind::InfoResponse => "InfoResponse",
            MessageKind::StartFileUploadRequest => "StartFileUploadRequest",
            MessageKind::StartFileUploadResponse => "StartFileUploadResponse",
            MessageKind::TransferChunkRequest => "TransferChunkRequest",
            MessageKind::TransferChunkResponse => "TransferChunkResponse",
            MessageKind::ProgramFlowRequest => "ProgramFlowRequest",
            MessageKind::ProgramFlowResponse => "ProgramFlowResponse",
            MessageKind::ProgramFlowNotification => "ProgramFlowNotification",
            MessageKind::ConsoleNotification => "ConsoleNotification",
        }
    }

    /// Which side sends this message.
    pub fn direction(self) -> Direction {
        match self {
            MessageKind::InfoRequest
            | MessageKind::StartFileUploadRequest
            | MessageKind::TransferChunkRequest
            | MessageKind::ProgramFlowRequest => Direction::ToHub,
            _ => Direction::FromHub,
        }
    }

    /// The response kind a request is answered with, if any.
    pub fn response(self) -> Option<MessageKind> {
        match self {
            MessageKind::InfoRequest => Some(MessageKind::InfoResponse),
            MessageKind::StartFileUploadRequest => Some(MessageKind::StartFileUploadResponse),
            MessageKind::TransferChunkRequest => Some(MessageKind::TransferChunkResponse),
            MessageKind::ProgramFlowRequest => Some(MessageKind::ProgramFlowResponse),
            _ => None,
        }
    }

    /// True for messages the hub sends without being asked.
    pub fn is_notification(self) -> bool {
        matches!(
            self,
            MessageKind::ProgramFlowNotification | MessageKind::ConsoleNotification
        )
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = crate::error::ProtoError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_tag(tag).ok_or(crate::error::ProtoError::UnknownTag(tag))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.tag())
    }
}
