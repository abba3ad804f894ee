/// Errors that can occur while decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A block code byte that no encoder can produce.
    #[error("invalid block code 0x{code:02x} at offset {offset}")]
    InvalidCode { code: u8, offset: usize },

    /// The input ended inside a block.
    #[error("truncated frame ({missing} byte(s) missing from last block)")]
    Truncated { missing: usize },

    /// The frame does not end with the delimiter byte.
    #[error("frame not terminated by delimiter 0x02")]
    MissingDelimiter,

    /// A pending frame grew past the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
