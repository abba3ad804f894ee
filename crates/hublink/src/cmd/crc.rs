use hublink_client::crc32_with_alignment;
use serde::Serialize;

use crate::cmd::{read_file, CrcArgs};
use crate::exit::CliResult;
use crate::output::{crc_string, print_record, OutputFormat};

#[derive(Serialize)]
struct CrcOutput {
    file: String,
    size: usize,
    padded_size: usize,
    seed: String,
    crc: String,
    /// Value as carried on the wire (signed 32-bit).
    crc_signed: i32,
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<()> {
    let data = read_file(&args.path)?;
    let crc = crc32_with_alignment(&data, args.seed);

    let out = CrcOutput {
        file: args.path.display().to_string(),
        size: data.len(),
        padded_size: data.len().next_multiple_of(4),
        seed: crc_string(args.seed),
        crc: crc_string(crc),
        crc_signed: crc as i32,
    };
    let fields = [
        ("file", out.file.clone()),
        ("size", out.size.to_string()),
        ("padded size", out.padded_size.to_string()),
        ("seed", out.seed.clone()),
        ("crc", out.crc.clone()),
        ("crc (signed)", out.crc_signed.to_string()),
    ];
    print_record(&out, &fields, format);
    Ok(())
}
