use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtoError, Result};
use crate::kind::MessageKind;
use crate::wire::{ensure, read_cstr, read_i32, read_u16, read_u8};

/// Maximum encoded length of an upload file name (terminator excluded).
pub const MAX_FILE_NAME_LEN: usize = 31;

/// Maximum chunk length representable in the 16-bit length field.
pub const MAX_CHUNK_LEN: usize = u16::MAX as usize;

/// Announce an upload: file name, target slot and whole-file CRC32.
///
/// Wire layout after the tag:
/// ```text
/// file name (UTF-8, ≤31 bytes) 0x00 | slot(1) | crc(4, signed LE)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartFileUploadRequest {
    file_name: String,
    slot: u8,
    crc: u32,
}

impl StartFileUploadRequest {
    /// Build a request, validating the file name against the fixed field.
    pub fn new(file_name: impl Into<String>, slot: u8, crc: u32) -> Result<Self> {
        let file_name = file_name.into();
        validate_file_name(&file_name)?;
        Ok(Self {
            file_name,
            slot,
            crc,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_slice(self.file_name.as_bytes());
        dst.put_u8(0);
        dst.put_u8(self.slot);
        dst.put_i32_le(self.crc as i32);
    }

    pub(crate) fn decode_body(mut body: &[u8]) -> Result<Self> {
        const KIND: MessageKind = MessageKind::StartFileUploadRequest;
        let body = &mut body;

        let name = read_cstr(body, KIND, "file name")?;
        let file_name = String::from_utf8_lossy(name).into_owned();
        let slot = read_u8(body, KIND, "slot")?;
        let crc = read_i32(body, KIND, "crc")? as u32;

        Ok(Self {
            file_name,
            slot,
            crc,
        })
    }
}

/// One block of an upload with the running CRC32 up to and including it.
///
/// Wire layout after the tag:
/// ```text
/// running crc(4, signed LE) | length(2 LE) | payload(length)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferChunkRequest {
    running_crc: u32,
    payload: Bytes,
}

impl TransferChunkRequest {
    /// Build a request, validating the chunk against the 16-bit length field.
    pub fn new(running_crc: u32, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_CHUNK_LEN {
            return Err(ProtoError::ChunkTooLarge {
                len: payload.len(),
                max: MAX_CHUNK_LEN,
            });
        }
        Ok(Self {
            running_crc,
            payload,
        })
    }

    pub fn running_crc(&self) -> u32 {
        self.running_crc
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        dst.put_i32_le(self.running_crc as i32);
        dst.put_u16_le(self.payload.len() as u16);
        dst.put_slice(&self.payload);
    }

    pub(crate) fn decode_body(mut body: &[u8]) -> Result<Self> {
        const KIND: MessageKind = MessageKind::TransferChunkRequest;
        let body = &mut body;

        let running_crc = read_i32(body, KIND, "running crc")? as u32;
        let len = read_u16(body, KIND, "chunk length")? as usize;
        ensure(body, KIND, "chunk payload", len)?;
        let payload = Bytes::copy_from_slice(&body[..len]);

        Ok(Self {
            running_crc,
            payload,
        })
    }
}

fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.len() > MAX_FILE_NAME_LEN {
        return Err(ProtoError::FileNameTooLong {
            len: file_name.len(),
            max: MAX_FILE_NAME_LEN,
        });
    }
    if file_name.as_bytes().contains(&0) {
        return Err(ProtoError::InvalidFileName);
    }
    Ok(())
}
