use hublink_frame::pack;
use serde::Serialize;

use crate::cmd::{parse_hex, read_file, PackArgs};
use crate::exit::CliResult;
use crate::output::{hex_string, print_record, OutputFormat};

#[derive(Serialize)]
struct PackOutput {
    payload_size: usize,
    frame_size: usize,
    frame: String,
}

pub fn run(args: PackArgs, format: OutputFormat) -> CliResult<()> {
    let payload = resolve_payload(&args)?;
    let frame = pack(&payload);

    let out = PackOutput {
        payload_size: payload.len(),
        frame_size: frame.len(),
        frame: hex_string(&frame),
    };
    let fields = [
        ("payload size", out.payload_size.to_string()),
        ("frame size", out.frame_size.to_string()),
        ("frame", out.frame.clone()),
    ];
    print_record(&out, &fields, format);
    Ok(())
}

fn resolve_payload(args: &PackArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex);
    }
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return read_file(path);
    }
    Ok(Vec::new())
}
