use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::exit::{io_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod crc;
pub mod decode;
pub mod pack;
pub mod plan;
pub mod unpack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Byte-stuff a payload into a frame.
    Pack(PackArgs),
    /// Decode a frame back to its payload.
    Unpack(UnpackArgs),
    /// Unpack a frame and describe the message it carries.
    Decode(DecodeArgs),
    /// Aligned CRC32 of a file, as sent with an upload.
    Crc(CrcArgs),
    /// Show how a file would be split into upload chunks.
    Plan(PlanArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<()> {
    match command {
        Command::Pack(args) => pack::run(args, format),
        Command::Unpack(args) => unpack::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Crc(args) => crc::run(args, format),
        Command::Plan(args) => plan::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Payload as hex bytes.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Payload as a UTF-8 string.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["hex", "data"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Frame as hex bytes, delimiter included.
    pub frame: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame (or message with --unpacked) as hex bytes.
    pub frame: String,
    /// Input is an already unpacked message starting with its tag byte.
    #[arg(long)]
    pub unpacked: bool,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// File to checksum.
    pub path: PathBuf,
    /// Running CRC to continue from (decimal or 0x-prefixed hex).
    #[arg(long, default_value = "0", value_parser = parse_u32)]
    pub seed: u32,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// File to upload.
    pub path: PathBuf,
    /// Negotiated maximum chunk size in bytes.
    #[arg(long)]
    pub chunk_size: u16,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse hex bytes, ignoring whitespace, `:` separators and a `0x` prefix.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits).map_err(|err| CliError::usage(format!("invalid hex input: {err}")))
}

pub fn read_file(path: &Path) -> CliResult<Vec<u8>> {
    fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

fn parse_u32(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid value {input:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_accepts_separators_and_prefix() {
        assert_eq!(parse_hex("0x13 4b:66").unwrap(), vec![0x13, 0x4b, 0x66]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn hex_rejects_odd_length() {
        let err = parse_hex("123").unwrap_err();
        assert_eq!(err.exit, crate::exit::Exit::Usage);
    }

    #[test]
    fn u32_decimal_and_hex() {
        assert_eq!(parse_u32("42"), Ok(42));
        assert_eq!(parse_u32("0xFFFFFFFF"), Ok(u32::MAX));
        assert!(parse_u32("0x1_0000_0000").is_err());
    }
}
