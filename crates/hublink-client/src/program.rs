use std::fmt;
use std::future::Future;

use hublink_transport::Transport;
use tracing::debug;

use crate::client::HubClient;
use crate::error::{HubError, Result};

/// Highest program slot on the hub.
pub const MAX_SLOT: u8 = 19;

/// Upload name for plain source.
pub const SOURCE_FILE_NAME: &str = "program.py";

/// Upload name for compiled bytecode.
pub const COMPILED_FILE_NAME: &str = "program.mpy";

const HEADER_PREFIX: &str = "# LEGO";

/// First-line program header: `# LEGO slot:<n> [autostart]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramHeader {
    /// Target slot, `None` when missing or outside `0..=MAX_SLOT`.
    pub slot: Option<u8>,
    /// Start the program once the upload completes.
    pub autostart: bool,
}

impl ProgramHeader {
    pub fn new(slot: u8, autostart: bool) -> Self {
        Self {
            slot: (slot <= MAX_SLOT).then_some(slot),
            autostart,
        }
    }

    /// Read the header from the first line of `source`.
    ///
    /// Returns `None` when the first line is not a header.
    pub fn parse(source: &str) -> Option<Self> {
        let line = source.lines().next()?;
        let rest = line.strip_prefix(HEADER_PREFIX)?;

        let mut header = Self::default();
        let mut tokens = rest
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|token| !token.is_empty());
        while let Some(token) = tokens.next() {
            match token {
                "slot" => {
                    header.slot = tokens
                        .next()
                        .and_then(|value| value.parse::<u8>().ok())
                        .filter(|slot| *slot <= MAX_SLOT);
                }
                "autostart" => header.autostart = true,
                _ => {}
            }
        }
        Some(header)
    }

    /// Header text ready to prepend to a source file.
    pub fn render(&self) -> String {
        format!("{self}\n\n")
    }
}

impl fmt::Display for ProgramHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HEADER_PREFIX)?;
        if let Some(slot) = self.slot {
            write!(f, " slot:{slot}")?;
        }
        if self.autostart {
            f.write_str(" autostart")?;
        }
        Ok(())
    }
}

/// A compiler run that did not produce bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub status: i32,
    pub diagnostics: Vec<String>,
}

/// Turns program source into bytecode before upload.
pub trait Compiler: Send + Sync {
    fn compile(
        &self,
        file_name: &str,
        source: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, CompileFailure>> + Send;
}

impl<T: Transport> HubClient<T> {
    /// Upload a program into `slot`, compiling it first when a compiler is given.
    ///
    /// `source_name` is the path of the edited file and is what compiler
    /// diagnostics refer to. Returns the name the program was stored under.
    /// Compiler diagnostics are also sent to the logger.
    pub async fn upload_program<C: Compiler>(
        &self,
        source_name: &str,
        source: &str,
        compiler: Option<&C>,
        slot: u8,
        progress: impl FnMut(f64),
    ) -> Result<&'static str> {
        let (file_name, data) = match compiler {
            Some(compiler) => match compiler.compile(source_name, source).await {
                Ok(bytecode) => (COMPILED_FILE_NAME, bytecode),
                Err(failure) => {
                    self.logger().error(&failure.diagnostics.join("\r\n"));
                    return Err(HubError::CompileFailed {
                        status: failure.status,
                        diagnostics: failure.diagnostics,
                    });
                }
            },
            None => (SOURCE_FILE_NAME, source.as_bytes().to_vec()),
        };

        debug!(file_name, slot, len = data.len(), "uploading program");
        self.upload_file(file_name, slot, &data, progress).await?;
        Ok(file_name)
    }
}
