use hublink_frame::unpack;
use serde::Serialize;

use crate::cmd::{parse_hex, UnpackArgs};
use crate::exit::{frame_error, CliResult};
use crate::output::{hex_string, print_record, text_preview, OutputFormat};

#[derive(Serialize)]
struct UnpackOutput {
    frame_size: usize,
    payload_size: usize,
    payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

pub fn run(args: UnpackArgs, format: OutputFormat) -> CliResult<()> {
    let frame = parse_hex(&args.frame)?;
    let payload = unpack(&frame).map_err(|err| frame_error("unpack failed", err))?;

    let out = UnpackOutput {
        frame_size: frame.len(),
        payload_size: payload.len(),
        payload: hex_string(&payload),
        text: text_preview(&payload),
    };
    let mut fields = vec![
        ("frame size", out.frame_size.to_string()),
        ("payload size", out.payload_size.to_string()),
        ("payload", out.payload.clone()),
    ];
    if let Some(text) = &out.text {
        fields.push(("text", text.clone()));
    }
    print_record(&out, &fields, format);
    Ok(())
}
