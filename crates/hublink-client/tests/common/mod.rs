#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use hublink_client::{ClientConfig, HubClient, HubLogger};
use hublink_frame::{pack, unpack, FrameBuffer};
use hublink_proto::{InfoResponse, Message, StatusResponse, Version};
use hublink_transport::{Transport, TransportError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Records every write and forwards it to the fake hub.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    writes: Mutex<Vec<Vec<u8>>>,
}

impl ChannelTransport {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().expect("writes lock").clone()
    }
}

impl Transport for ChannelTransport {
    async fn write_bytes(&self, bytes: &[u8]) -> hublink_transport::Result<()> {
        self.writes.lock().expect("writes lock").push(bytes.to_vec());
        self.tx
            .send(bytes.to_vec())
            .map_err(|_| TransportError::Closed)
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        self.lines.lock().expect("logger lock").clone()
    }

    fn push(&self, level: &'static str, text: &str) {
        self.lines
            .lock()
            .expect("logger lock")
            .push((level, text.to_owned()));
    }
}

impl HubLogger for RecordingLogger {
    fn info(&self, text: &str) {
        self.push("info", text);
    }

    fn error(&self, text: &str) {
        self.push("error", text);
    }

    fn log(&self, text: &str) {
        self.push("log", text);
    }
}

/// Decides what the fake hub sends back for each request it decodes.
pub type Script = Box<dyn FnMut(&Message) -> Vec<Message> + Send>;

pub struct Harness {
    pub client: Arc<HubClient<ChannelTransport>>,
    pub logger: Arc<RecordingLogger>,
    pub requests: Arc<Mutex<Vec<Message>>>,
    hub: JoinHandle<()>,
}

impl Harness {
    pub fn requests(&self) -> Vec<Message> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.hub.abort();
    }
}

/// Start a client wired to a scripted hub.
///
/// The hub reassembles fragments into frames, decodes each request, records
/// it and replies with whatever `script` returns.
pub fn start(config: ClientConfig, mut script: Script) -> Harness {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let logger = Arc::new(RecordingLogger::default());
    let transport = ChannelTransport {
        tx,
        writes: Mutex::new(Vec::new()),
    };
    let client = Arc::new(HubClient::with_config(transport, config).with_logger(logger.clone()));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let hub = {
        let client = Arc::clone(&client);
        let requests = Arc::clone(&requests);
        tokio::spawn(async move {
            let mut frames = FrameBuffer::new();
            while let Some(fragment) = rx.recv().await {
                for frame in frames.push(&fragment) {
                    let payload = unpack(&frame).expect("client frames should unpack");
                    let request = Message::decode(&payload).expect("client messages should decode");
                    let replies = script(&request);
                    requests.lock().expect("requests lock").push(request);
                    for reply in replies {
                        client.on_bytes_received(&pack(&reply.encode()));
                    }
                }
            }
        })
    };

    Harness {
        client,
        logger,
        requests,
        hub,
    }
}

pub fn info(max_packet_size: u16, max_chunk_size: u16) -> InfoResponse {
    InfoResponse {
        protocol_version: Version::new(1, 0, 0),
        firmware_version: Version::new(1, 6, 62),
        max_packet_size,
        max_message_size: 4096,
        max_chunk_size,
        product_group_device: 0x0081,
    }
}

/// Answers every request the way a healthy hub does.
pub fn healthy_hub(info: InfoResponse) -> Script {
    Box::new(move |request| match request {
        Message::InfoRequest => vec![Message::InfoResponse(info)],
        Message::StartFileUploadRequest(_) => {
            vec![Message::StartFileUploadResponse(StatusResponse::ack())]
        }
        Message::TransferChunkRequest(_) => {
            vec![Message::TransferChunkResponse(StatusResponse::ack())]
        }
        Message::ProgramFlowRequest(_) => vec![Message::ProgramFlowResponse(StatusResponse::ack())],
        _ => Vec::new(),
    })
}
