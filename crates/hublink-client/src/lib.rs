//! Correlation engine for hub links.
//!
//! [`HubClient`] sits in front of any [`Transport`](hublink_transport::Transport):
//! it packs outgoing messages, fragments them to the negotiated packet size,
//! matches incoming responses to their requests by tag, and routes
//! unsolicited notifications to observers. Chunked file upload and program
//! control are built on top.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod program;
pub mod upload;

pub use client::{Dispatch, HubClient};
pub use config::{ClientConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_RESPONSE_TIMEOUT};
pub use error::{HubError, Result};
pub use event::{HubEvent, HubLogger, TracingLogger, CONSOLE_TARGET};
pub use program::{
    CompileFailure, Compiler, ProgramHeader, COMPILED_FILE_NAME, MAX_SLOT, SOURCE_FILE_NAME,
};
pub use upload::{crc32_with_alignment, PlannedChunk, UploadPlan};
