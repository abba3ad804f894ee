use std::io;
use std::process::ExitCode;

use hublink_client::HubError;
use hublink_frame::FrameError;
use hublink_proto::ProtoError;

/// Process exit statuses, sysexits-style where one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    Failure = 1,
    PermissionDenied = 50,
    DataInvalid = 60,
    Usage = 64,
    Internal = 125,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    pub exit: Exit,
    pub message: String,
}

impl CliError {
    pub fn new(exit: Exit, message: impl Into<String>) -> Self {
        Self {
            exit,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(Exit::Usage, message)
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let exit = match err.kind() {
        io::ErrorKind::PermissionDenied => Exit::PermissionDenied,
        io::ErrorKind::NotFound => Exit::Failure,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => Exit::DataInvalid,
        _ => Exit::Internal,
    };
    CliError::new(exit, format!("{context}: {err}"))
}

/// Codec failures mean the input bytes were bad.
pub fn frame_error(context: &str, err: FrameError) -> CliError {
    if let FrameError::Io(source) = err {
        return io_error(context, source);
    }
    CliError::new(Exit::DataInvalid, format!("{context}: {err}"))
}

pub fn proto_error(context: &str, err: ProtoError) -> CliError {
    let exit = match err {
        // Rejected while building a message from user arguments.
        ProtoError::FileNameTooLong { .. }
        | ProtoError::InvalidFileName
        | ProtoError::ChunkTooLarge { .. } => Exit::Usage,
        _ => Exit::DataInvalid,
    };
    CliError::new(exit, format!("{context}: {err}"))
}

pub fn client_error(context: &str, err: HubError) -> CliError {
    let exit = match err {
        HubError::Frame(err) => return frame_error(context, err),
        HubError::Proto(err) => return proto_error(context, err),
        HubError::InvalidChunkSize(_) => Exit::Usage,
        _ => Exit::Internal,
    };
    CliError::new(exit, format!("{context}: {err}"))
}
