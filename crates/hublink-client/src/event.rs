/// `tracing` target used by [`TracingLogger`].
pub const CONSOLE_TARGET: &str = "hublink::console";

/// Connection-level events published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubEvent {
    /// The hub started (`true`) or stopped (`false`) running a program.
    ProgramRunningChanged(bool),
    /// The connection closed. Pending requests were abandoned.
    Closed,
}

/// Sink for hub console output and user-facing diagnostics.
///
/// Calls happen on the dispatch path and must not block.
pub trait HubLogger: Send + Sync {
    /// Informational message.
    fn info(&self, text: &str);
    /// Error message (decode failures, compiler diagnostics).
    fn error(&self, text: &str);
    /// Raw console output from the running program.
    fn log(&self, text: &str);
}

/// Forwards everything to `tracing` under [`CONSOLE_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl HubLogger for TracingLogger {
    fn info(&self, text: &str) {
        tracing::info!(target: CONSOLE_TARGET, "{text}");
    }

    fn error(&self, text: &str) {
        tracing::error!(target: CONSOLE_TARGET, "{text}");
    }

    fn log(&self, text: &str) {
        tracing::info!(target: CONSOLE_TARGET, console = true, "{text}");
    }
}
