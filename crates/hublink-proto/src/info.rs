use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::kind::MessageKind;
use crate::wire::{read_u16, read_u8};

const KIND: MessageKind = MessageKind::InfoResponse;

/// `major.minor.build` version triple as reported by the hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub build: u16,
}

impl Version {
    pub const fn new(major: u8, minor: u8, build: u16) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Negotiated session parameters, sent by the hub in reply to `InfoRequest`.
///
/// Wire layout after the tag (16 bytes):
/// ```text
/// rpc major(1) minor(1) build(2) | fw major(1) minor(1) build(2)
/// max packet(2) | max message(2) | max chunk(2) | product group(2)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoResponse {
    /// Protocol (RPC) version.
    pub protocol_version: Version,
    /// Hub firmware version.
    pub firmware_version: Version,
    /// Largest single transport write the hub accepts.
    pub max_packet_size: u16,
    /// Largest complete message the hub accepts.
    pub max_message_size: u16,
    /// Largest file-transfer chunk the hub accepts.
    pub max_chunk_size: u16,
    /// Product group / device type identifier.
    pub product_group_device: u16,
}

impl InfoResponse {
    pub(crate) fn encode_body(&self, dst: &mut BytesMut) {
        for version in [self.protocol_version, self.firmware_version] {
            dst.put_u8(version.major);
            dst.put_u8(version.minor);
            dst.put_u16_le(version.build);
        }
        dst.put_u16_le(self.max_packet_size);
        dst.put_u16_le(self.max_message_size);
        dst.put_u16_le(self.max_chunk_size);
        dst.put_u16_le(self.product_group_device);
    }

    pub(crate) fn decode_body(mut body: &[u8]) -> Result<Self> {
        let body = &mut body;
        let protocol_version = Version {
            major: read_u8(body, KIND, "protocol major")?,
            minor: read_u8(body, KIND, "protocol minor")?,
            build: read_u16(body, KIND, "protocol build")?,
        };
        let firmware_version = Version {
            major: read_u8(body, KIND, "firmware major")?,
            minor: read_u8(body, KIND, "firmware minor")?,
            build: read_u16(body, KIND, "firmware build")?,
        };

        Ok(Self {
            protocol_version,
            firmware_version,
            max_packet_size: read_u16(body, KIND, "max packet size")?,
            max_message_size: read_u16(body, KIND, "max message size")?,
            max_chunk_size: read_u16(body, KIND, "max chunk size")?,
            product_group_device: read_u16(body, KIND, "product group")?,
        })
    }
}
