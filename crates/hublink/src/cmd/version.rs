use serde::Serialize;

use crate::cmd::VersionArgs;
use crate::exit::CliResult;
use crate::output::{print_record, OutputFormat};

#[derive(Serialize)]
struct BuildInfo {
    version: &'static str,
    target: &'static str,
    os: &'static str,
    arch: &'static str,
    delimiter: String,
    max_block_size: usize,
    xor_mask: String,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<()> {
    if !args.extended {
        println!("hublink {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let info = BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        target: option_env!("HUBLINK_BUILD_TARGET").unwrap_or("unknown"),
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        delimiter: format!("0x{:02x}", hublink_frame::DELIMITER),
        max_block_size: hublink_frame::MAX_BLOCK_SIZE,
        xor_mask: format!("0x{:02x}", hublink_frame::XOR_MASK),
    };
    let fields = [
        ("version", info.version.to_string()),
        ("build target", info.target.to_string()),
        ("os", info.os.to_string()),
        ("arch", info.arch.to_string()),
        ("frame delimiter", info.delimiter.clone()),
        ("max block size", info.max_block_size.to_string()),
        ("xor mask", info.xor_mask.clone()),
    ];
    print_record(&info, &fields, format);
    Ok(())
}
