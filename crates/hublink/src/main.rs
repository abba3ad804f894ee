mod cmd;
mod exit;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cmd::Command;
use crate::exit::Exit;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

/// Offline tooling for the hub link: frames, messages, upload planning.
#[derive(Parser, Debug)]
#[command(name = "hublink", version)]
struct Cli {
    /// Report format on stdout [default: table on a terminal, json otherwise].
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Diagnostics format on stderr.
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Diagnostics level on stderr.
    #[arg(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let Cli {
        format,
        log_format,
        log_level,
        command,
    } = Cli::parse();
    init_logging(log_format, log_level);

    let format = format.unwrap_or_else(OutputFormat::default_for_stdout);
    if let Err(err) = cmd::run(command, format) {
        eprintln!("hublink: {err}");
        return err.exit.into();
    }
    Exit::Success.into()
}
