use crate::kind::MessageKind;

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtoError {
    /// The decoded frame held no bytes at all.
    #[error("empty message (no tag byte)")]
    Empty,

    /// The tag byte does not belong to the catalog.
    #[error("unknown message tag 0x{0:02x}")]
    UnknownTag(u8),

    /// A field extends past the end of the message.
    #[error("{kind}: truncated {field} (need {needed} bytes, have {available})")]
    Truncated {
        kind: MessageKind,
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// A NUL-terminated field has no terminator.
    #[error("{kind}: {field} is not NUL-terminated")]
    Unterminated {
        kind: MessageKind,
        field: &'static str,
    },

    /// The UTF-8 file name does not fit the fixed field.
    #[error("file name too long ({len} bytes, max {max})")]
    FileNameTooLong { len: usize, max: usize },

    /// The file name contains a NUL byte.
    #[error("file name must not contain NUL bytes")]
    InvalidFileName,

    /// A chunk does not fit the 16-bit length field.
    #[error("chunk too large ({len} bytes, max {max})")]
    ChunkTooLarge { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
