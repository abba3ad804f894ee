use bytes::{BufMut, Bytes, BytesMut};

use crate::console::ConsoleNotification;
use crate::error::{ProtoError, Result};
use crate::file::{StartFileUploadRequest, TransferChunkRequest};
use crate::info::InfoResponse;
use crate::kind::MessageKind;
use crate::program::{ProgramFlowNotification, ProgramFlowRequest};
use crate::status::StatusResponse;

/// A decoded hub message.
///
/// Encoding writes the tag followed by the body. Decoding tolerates trailing
/// bytes after the last field, since some firmware pads its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    InfoRequest,
    InfoResponse(InfoResponse),
    StartFileUploadRequest(StartFileUploadRequest),
    StartFileUploadResponse(StatusResponse),
    TransferChunkRequest(TransferChunkRequest),
    TransferChunkResponse(StatusResponse),
    ProgramFlowRequest(ProgramFlowRequest),
    ProgramFlowResponse(StatusResponse),
    ProgramFlowNotification(ProgramFlowNotification),
    ConsoleNotification(ConsoleNotification),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::InfoRequest => MessageKind::InfoRequest,
            Message::InfoResponse(_) => MessageKind::InfoResponse,
            Message::StartFileUploadRequest(_) => MessageKind::StartFileUploadRequest,
            Message::StartFileUploadResponse(_) => MessageKind::StartFileUploadResponse,
            Message::TransferChunkRequest(_) => MessageKind::TransferChunkRequest,
            Message::TransferChunkResponse(_) => MessageKind::TransferChunkResponse,
            Message::ProgramFlowRequest(_) => MessageKind::ProgramFlowRequest,
            Message::ProgramFlowResponse(_) => MessageKind::ProgramFlowResponse,
            Message::ProgramFlowNotification(_) => MessageKind::ProgramFlowNotification,
            Message::ConsoleNotification(_) => MessageKind::ConsoleNotification,
        }
    }

    /// Status byte of an acknowledgement, `None` for other messages.
    pub fn status(&self) -> Option<StatusResponse> {
        match self {
            Message::StartFileUploadResponse(status)
            | Message::TransferChunkResponse(status)
            | Message::ProgramFlowResponse(status) => Some(*status),
            _ => None,
        }
    }

    /// Serialize to `tag | body`.
    pub fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.encoded_len_hint());
        self.encode_into(&mut dst);
        dst.freeze()
    }

    /// Append `tag | body` to `dst`.
    pub fn encode_into(&self, dst: &mut BytesMut) {
        dst.put_u8(self.kind().tag());
        match self {
            Message::InfoRequest => {}
            Message::InfoResponse(info) => info.encode_body(dst),
            Message::StartFileUploadRequest(request) => request.encode_body(dst),
            Message::TransferChunkRequest(request) => request.encode_body(dst),
            Message::ProgramFlowRequest(request) => request.encode_body(dst),
            Message::StartFileUploadResponse(status)
            | Message::TransferChunkResponse(status)
            | Message::ProgramFlowResponse(status) => status.encode_body(dst),
            Message::ProgramFlowNotification(note) => note.encode_body(dst),
            Message::ConsoleNotification(note) => note.encode_body(dst),
        }
    }

    /// Parse a complete message (tag included).
    pub fn decode(bytes: &[u8]) -> Result<Message> {
        let (&tag, body) = bytes.split_first().ok_or(ProtoError::Empty)?;
        let kind = MessageKind::try_from(tag)?;

        Ok(match kind {
            MessageKind::InfoRequest => Message::InfoRequest,
            MessageKind::InfoResponse => Message::InfoResponse(InfoResponse::decode_body(body)?),
            MessageKind::StartFileUploadRequest => {
                Message::StartFileUploadRequest(StartFileUploadRequest::decode_body(body)?)
            }
            MessageKind::StartFileUploadResponse => {
                Message::StartFileUploadResponse(StatusResponse::decode_body(body, kind)?)
            }
            MessageKind::TransferChunkRequest => {
                Message::TransferChunkRequest(TransferChunkRequest::decode_body(body)?)
            }
            MessageKind::TransferChunkResponse => {
                Message::TransferChunkResponse(StatusResponse::decode_body(body, kind)?)
            }
            MessageKind::ProgramFlowRequest => {
                Message::ProgramFlowRequest(ProgramFlowRequest::decode_body(body)?)
            }
            MessageKind::ProgramFlowResponse => {
                Message::ProgramFlowResponse(StatusResponse::decode_body(body, kind)?)
            }
            MessageKind::ProgramFlowNotification => {
                Message::ProgramFlowNotification(ProgramFlowNotification::decode_body(body)?)
            }
            MessageKind::ConsoleNotification => {
                Message::ConsoleNotification(ConsoleNotification::decode_body(body))
            }
        })
    }

    fn encoded_len_hint(&self) -> usize {
        1 + match self {
            Message::InfoRequest => 0,
            Message::InfoResponse(_) => 16,
            Message::StartFileUploadRequest(request) => request.file_name().len() + 6,
            Message::TransferChunkRequest(request) => request.payload().len() + 6,
            Message::ProgramFlowRequest(_) => 2,
            Message::ConsoleNotification(note) => note.text.len(),
            _ => 1,
        }
    }
}

impl From<InfoResponse> for Message {
    fn from(info: InfoResponse) -> Self {
        Message::InfoResponse(info)
    }
}

impl From<StartFileUploadRequest> for Message {
    fn from(request: StartFileUploadRequest) -> Self {
        Message::StartFileUploadRequest(request)
    }
}

impl From<TransferChunkRequest> for Message {
    fn from(request: TransferChunkRequest) -> Self {
        Message::TransferChunkRequest(request)
    }
}

impl From<ProgramFlowRequest> for Message {
    fn from(request: ProgramFlowRequest) -> Self {
        Message::ProgramFlowRequest(request)
    }
}

impl From<ProgramFlowNotification> for Message {
    fn from(note: ProgramFlowNotification) -> Self {
        Message::ProgramFlowNotification(note)
    }
}

impl From<ConsoleNotification> for Message {
    fn from(note: ConsoleNotification) -> Self {
        Message::ConsoleNotification(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Version;

    fn sample_info() -> InfoResponse {
        InfoResponse {
            protocol_version: Version::new(1, 0, 0),
            firmware_version: Version::new(1, 4, 17),
            max_packet_size: 20,
            max_message_size: 512,
            max_chunk_size: 256,
            product_group_device: 0x0081,
        }
    }

    fn catalog() -> Vec<Message> {
        vec![
            Message::InfoRequest,
            Message::InfoResponse(sample_info()),
            Message::StartFileUploadRequest(
                StartFileUploadRequest::new("program.mpy", 3, 0xDEAD_BEEF).unwrap(),
            ),
            Message::StartFileUploadResponse(StatusResponse::ack()),
            Message::TransferChunkRequest(
                TransferChunkRequest::new(0x8000_0001, vec![0x02, 0x01, 0x00, 0xFF]).unwrap(),
            ),
            Message::TransferChunkResponse(StatusResponse::nack(1)),
            Message::ProgramFlowRequest(ProgramFlowRequest::stop(0)),
            Message::ProgramFlowResponse(StatusResponse::ack()),
            Message::ProgramFlowNotification(ProgramFlowNotification { stopped: true }),
            Message::ConsoleNotification(ConsoleNotification::new("ready\n")),
        ]
    }

    #[test]
    fn every_message_survives_encode_and_decode() {
        for message in catalog() {
            let bytes = message.encode();
            assert_eq!(bytes[0], message.kind().tag());
            assert_eq!(Message::decode(&bytes).unwrap(), message, "{}", message.kind());
        }
    }

    #[test]
    fn catalog_covers_every_kind() {
        let kinds: Vec<_> = catalog().iter().map(Message::kind).collect();
        assert_eq!(kinds, MessageKind::ALL);
    }

    #[test]
    fn info_request_is_a_single_byte() {
        assert_eq!(Message::InfoRequest.encode().as_ref(), &[0x00]);
    }

    #[test]
    fn program_flow_request_bytes() {
        let bytes = Message::from(ProgramFlowRequest::start(5)).encode();
        assert_eq!(bytes.as_ref(), &[0x1E, 0x00, 0x05]);
    }

    #[test]
    fn chunk_crc_is_written_as_signed_le() {
        let request = TransferChunkRequest::new(0xFFFF_FFFE, vec![0xAA]).unwrap();
        let bytes = Message::from(request).encode();
        assert_eq!(bytes.as_ref(), &[0x10, 0xFE, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0xAA]);
    }

    #[test]
    fn trailing_padding_is_tolerated() {
        for message in catalog() {
            if matches!(message, Message::ConsoleNotification(_)) {
                continue;
            }
            let mut padded = BytesMut::new();
            message.encode_into(&mut padded);
            padded.put_slice(&[0, 0, 0]);
            assert_eq!(Message::decode(&padded).unwrap(), message, "{}", message.kind());
        }
    }

    #[test]
    fn program_stopped_notification_decodes() {
        assert_eq!(
            Message::decode(&[0x20, 0x00]).unwrap(),
            Message::ProgramFlowNotification(ProgramFlowNotification { stopped: false })
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(Message::decode(&[]).unwrap_err(), ProtoError::Empty);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(Message::decode(&[0x42, 0x00]).unwrap_err(), ProtoError::UnknownTag(0x42));
    }

    #[test]
    fn truncated_response_is_rejected() {
        let err = Message::decode(&[0x0D]).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::Truncated { kind: MessageKind::StartFileUploadResponse, .. }
        ));
    }

    #[test]
    fn status_accessor_covers_acknowledgements() {
        assert_eq!(
            Message::TransferChunkResponse(StatusResponse::nack(2)).status(),
            Some(StatusResponse::nack(2))
        );
        assert_eq!(Message::InfoRequest.status(), None);
    }
}
