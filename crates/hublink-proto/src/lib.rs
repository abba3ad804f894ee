//! Tagged binary message catalog for the hub protocol.
//!
//! Every message starts with a one-byte tag that identifies its layout and
//! doubles as the correlation key for responses. All multi-byte integers are
//! little-endian.
//!
//! | Tag    | Message                   | Direction  |
//! |--------|---------------------------|------------|
//! | `0x00` | InfoRequest               | host → hub |
//! | `0x01` | InfoResponse              | hub → host |
//! | `0x0C` | StartFileUploadRequest    | host → hub |
//! | `0x0D` | StartFileUploadResponse   | hub → host |
//! | `0x10` | TransferChunkRequest      | host → hub |
//! | `0x11` | TransferChunkResponse     | hub → host |
//! | `0x1E` | ProgramFlowRequest        | host → hub |
//! | `0x1F` | ProgramFlowResponse       | hub → host |
//! | `0x20` | ProgramFlowNotification   | hub → host |
//! | `0x21` | ConsoleNotification       | hub → host |

pub mod console;
pub mod error;
pub mod file;
pub mod info;
pub mod kind;
pub mod message;
pub mod program;
pub mod status;

mod wire;

pub use console::ConsoleNotification;
pub use error::{ProtoError, Result};
pub use file::{StartFileUploadRequest, TransferChunkRequest, MAX_CHUNK_LEN, MAX_FILE_NAME_LEN};
pub use info::{InfoResponse, Version};
pub use kind::{Direction, MessageKind};
pub use message::Message;
pub use program::{ProgramFlowNotification, ProgramFlowRequest};
pub use status::StatusResponse;
