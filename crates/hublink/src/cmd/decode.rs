use hublink_frame::unpack;
use hublink_proto::{Direction, Message};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{frame_error, proto_error, CliResult};
use crate::output::{crc_string, hex_string, print_record, Field, OutputFormat};

#[derive(Serialize)]
struct DecodeOutput {
    tag: String,
    kind: &'static str,
    direction: &'static str,
    fields: Map<String, Value>,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<()> {
    let input = parse_hex(&args.frame)?;
    let bytes = if args.unpacked {
        input
    } else {
        unpack(&input)
            .map_err(|err| frame_error("unpack failed", err))?
            .to_vec()
    };
    let message = Message::decode(&bytes).map_err(|err| proto_error("decode failed", err))?;
    let kind = message.kind();

    let described = describe(&message);
    let out = DecodeOutput {
        tag: format!("0x{:02x}", kind.tag()),
        kind: kind.name(),
        direction: match kind.direction() {
            Direction::ToHub => "to_hub",
            Direction::FromHub => "from_hub",
        },
        fields: described
            .iter()
            .map(|(name, value)| (name.replace(' ', "_"), Value::String(value.clone())))
            .collect(),
    };

    let mut fields = vec![
        ("tag", out.tag.clone()),
        ("kind", out.kind.to_string()),
        ("direction", out.direction.to_string()),
    ];
    fields.extend(described);
    print_record(&out, &fields, format);
    Ok(())
}

/// Human-readable fields of a decoded message.
fn describe(message: &Message) -> Vec<Field> {
    match message {
        Message::InfoRequest => Vec::new(),
        Message::InfoResponse(info) => vec![
            ("protocol version", info.protocol_version.to_string()),
            ("firmware version", info.firmware_version.to_string()),
            ("max packet size", info.max_packet_size.to_string()),
            ("max message size", info.max_message_size.to_string()),
            ("max chunk size", info.max_chunk_size.to_string()),
            ("product group", format!("0x{:04x}", info.product_group_device)),
        ],
        Message::StartFileUploadRequest(request) => vec![
            ("file name", request.file_name().to_string()),
            ("slot", request.slot().to_string()),
            ("crc", crc_string(request.crc())),
        ],
        Message::StartFileUploadResponse(status)
        | Message::TransferChunkResponse(status)
        | Message::ProgramFlowResponse(status) => vec![
            ("status", format!("0x{:02x}", status.status)),
            ("ack", status.is_ack().to_string()),
        ],
        Message::TransferChunkRequest(request) => vec![
            ("running crc", crc_string(request.running_crc())),
            ("payload size", request.payload().len().to_string()),
            ("payload", hex_string(request.payload())),
        ],
        Message::ProgramFlowRequest(request) => vec![
            ("action", if request.stop { "stop" } else { "start" }.to_string()),
            ("slot", request.slot.to_string()),
        ],
        Message::ProgramFlowNotification(note) => vec![
            ("stopped", note.stopped.to_string()),
            ("running", note.is_running().to_string()),
        ],
        Message::ConsoleNotification(note) => vec![("text", note.text.clone())],
    }
}
