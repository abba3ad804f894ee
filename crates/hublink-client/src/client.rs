use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hublink_frame::{pack, unpack, FrameReader};
use hublink_proto::{
    InfoResponse, Message, MessageKind, ProgramFlowRequest, StartFileUploadRequest,
    StatusResponse, TransferChunkRequest,
};
use hublink_transport::Transport;
use tokio::io::AsyncRead;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{HubError, Result};
use crate::event::{HubEvent, HubLogger, TracingLogger};

/// How [`HubClient::on_bytes_received`] routed a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handed to the oldest request waiting for this kind.
    Resolved(MessageKind),
    /// Program-running notification, published to subscribers.
    ProgramRunningChanged(bool),
    /// Console text, forwarded to the logger.
    Console,
    /// Decoded fine but nobody was waiting for it.
    Ignored(MessageKind),
    /// Malformed frame or undecodable message.
    Dropped,
}

struct Waiter {
    id: u64,
    tx: oneshot::Sender<Message>,
}

#[derive(Default)]
struct ConnectionState {
    info: Option<InfoResponse>,
    pending: HashMap<MessageKind, VecDeque<Waiter>>,
}

/// One logical hub connection.
///
/// Owns the pending-request table, the negotiated device info and the write
/// pipeline. Inbound bytes are pushed in by the transport driver through
/// [`on_bytes_received`](Self::on_bytes_received) (or pumped with
/// [`run_reader`](Self::run_reader)); disconnects are reported through
/// [`on_closed`](Self::on_closed).
///
/// Several requests may be pending at once. Requests waiting on the same
/// response kind are answered oldest first. Responses carry no request id,
/// so a response that arrives after its caller timed out goes to the next
/// caller waiting on that kind, if there is one.
pub struct HubClient<T> {
    transport: T,
    config: ClientConfig,
    state: Mutex<ConnectionState>,
    write_lock: tokio::sync::Mutex<()>,
    events: broadcast::Sender<HubEvent>,
    logger: Arc<dyn HubLogger>,
    next_waiter: AtomicU64,
}

impl<T: Transport> HubClient<T> {
    /// Create a client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            transport,
            config,
            state: Mutex::new(ConnectionState::default()),
            write_lock: tokio::sync::Mutex::new(()),
            events,
            logger: Arc::new(TracingLogger),
            next_waiter: AtomicU64::new(0),
        }
    }

    /// Route console output and diagnostics to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn HubLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn logger(&self) -> &dyn HubLogger {
        self.logger.as_ref()
    }

    /// Subscribe to program-running and close events.
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.events.subscribe()
    }

    /// Send `message` and wait for the next response of kind `expected`.
    ///
    /// The waiter is registered before the first byte is written. The packed
    /// frame is split to the negotiated packet size and each fragment is
    /// awaited before the next is written.
    pub async fn send_message(&self, message: &Message, expected: MessageKind) -> Result<Message> {
        let frame = pack(&message.encode());
        let (id, rx) = self.register(expected);
        let _pending = PendingGuard {
            state: &self.state,
            kind: expected,
            id,
        };

        debug!(
            tag = message.kind().tag(),
            expected = expected.tag(),
            len = frame.len(),
            "sending message"
        );
        self.write_frame(&frame).await?;

        let received = match self.config.response_timeout {
            Some(after) => tokio::time::timeout(after, rx)
                .await
                .map_err(|_| HubError::Timeout {
                    kind: expected,
                    after,
                })?,
            None => rx.await,
        };
        received.map_err(|_| HubError::ConnectionClosed)
    }

    /// Route one raw frame received from the hub.
    ///
    /// Never fails: malformed frames and unknown tags are logged and dropped
    /// so the connection stays usable.
    pub fn on_bytes_received(&self, raw: &[u8]) -> Dispatch {
        let payload = match unpack(raw) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, len = raw.len(), "dropping malformed frame");
                return Dispatch::Dropped;
            }
        };
        let message = match Message::decode(&payload) {
            Ok(message) => message,
            Err(err) => {
                self.logger.error(&format!("Error deserializing message: {err}"));
                return Dispatch::Dropped;
            }
        };

        let kind = message.kind();
        trace!(tag = kind.tag(), len = payload.len(), "received message");
        let Some(message) = self.resolve(kind, message) else {
            return Dispatch::Resolved(kind);
        };

        match message {
            Message::ProgramFlowNotification(note) => {
                let running = note.is_running();
                // No subscribers is fine.
                let _ = self.events.send(HubEvent::ProgramRunningChanged(running));
                Dispatch::ProgramRunningChanged(running)
            }
            Message::ConsoleNotification(note) => {
                self.logger.log(&note.text);
                Dispatch::Console
            }
            _ => {
                debug!(tag = kind.tag(), "no pending request for message");
                Dispatch::Ignored(kind)
            }
        }
    }

    /// Forget the negotiated info and every pending request, then publish
    /// [`HubEvent::Closed`]. Waiting callers get [`HubError::ConnectionClosed`].
    pub fn on_closed(&self) {
        let abandoned = {
            let mut state = lock(&self.state);
            state.info = None;
            let abandoned: usize = state.pending.values().map(VecDeque::len).sum();
            state.pending.clear();
            abandoned
        };
        debug!(abandoned, "hub connection closed");
        let _ = self.events.send(HubEvent::Closed);
    }

    /// Pump frames from a byte stream into [`on_bytes_received`](Self::on_bytes_received)
    /// until EOF or a read error, then call [`on_closed`](Self::on_closed).
    pub async fn run_reader<R: AsyncRead + Unpin>(&self, reader: R) -> Result<()> {
        let mut frames = FrameReader::new(reader);
        let outcome = loop {
            match frames.read_frame().await {
                Ok(Some(frame)) => {
                    self.on_bytes_received(&frame);
                }
                Ok(None) => break Ok(()),
                Err(err) => {
                    warn!(error = %err, "hub stream read failed");
                    break Err(err.into());
                }
            }
        };
        self.on_closed();
        outcome
    }

    /// Ask the hub for its limits and versions and keep them for this connection.
    pub async fn negotiate(&self) -> Result<InfoResponse> {
        let response = self
            .send_message(&Message::InfoRequest, MessageKind::InfoResponse)
            .await?;
        let info = match response {
            Message::InfoResponse(info) => info,
            other => {
                return Err(HubError::UnexpectedResponse {
                    expected: MessageKind::InfoResponse,
                    actual: other.kind(),
                })
            }
        };

        debug!(
            firmware = %info.firmware_version,
            protocol = %info.protocol_version,
            max_packet = info.max_packet_size,
            max_chunk = info.max_chunk_size,
            "negotiated hub parameters"
        );
        lock(&self.state).info = Some(info);
        Ok(info)
    }

    /// Negotiated device info, if any.
    pub fn device_info(&self) -> Option<InfoResponse> {
        lock(&self.state).info
    }

    pub fn is_negotiated(&self) -> bool {
        self.device_info().is_some()
    }

    /// Firmware version as `major.minor.build`.
    pub fn firmware_version(&self) -> Option<String> {
        self.device_info()
            .map(|info| info.firmware_version.to_string())
    }

    /// Protocol version as `major.minor.build`.
    pub fn protocol_version(&self) -> Option<String> {
        self.device_info()
            .map(|info| info.protocol_version.to_string())
    }

    pub fn max_chunk_size(&self) -> Option<u16> {
        self.device_info().map(|info| info.max_chunk_size)
    }

    /// Number of requests still waiting for a response.
    pub fn pending_requests(&self) -> usize {
        lock(&self.state).pending.values().map(VecDeque::len).sum()
    }

    /// Start (`stop == false`) or stop the program in `slot`.
    ///
    /// Returns whether the hub acknowledged.
    pub async fn start_stop_program(&self, slot: u8, stop: bool) -> Result<bool> {
        let request = if stop {
            ProgramFlowRequest::stop(slot)
        } else {
            ProgramFlowRequest::start(slot)
        };
        let status = self
            .request_status(request.into(), MessageKind::ProgramFlowResponse)
            .await?;
        debug!(slot, stop, status = status.status, "program flow answered");
        Ok(status.is_ack())
    }

    /// Announce an upload of `crc`-checked data to `slot`.
    pub async fn start_file_upload(&self, file_name: &str, slot: u8, crc: u32) -> Result<()> {
        let request = StartFileUploadRequest::new(file_name, slot, crc)?;
        let status = self
            .request_status(request.into(), MessageKind::StartFileUploadResponse)
            .await?;
        if !status.is_ack() {
            return Err(HubError::UploadRejected {
                file_name: file_name.to_owned(),
                slot,
                status: status.status,
            });
        }
        Ok(())
    }

    /// Send one chunk of an upload announced with [`start_file_upload`](Self::start_file_upload).
    pub async fn transfer_chunk(&self, chunk: &[u8], running_crc: u32) -> Result<()> {
        let request = TransferChunkRequest::new(running_crc, chunk.to_vec())?;
        let kind = MessageKind::TransferChunkResponse;
        let status = self.request_status(request.into(), kind).await?;
        if !status.is_ack() {
            return Err(HubError::Nack {
                kind,
                status: status.status,
            });
        }
        Ok(())
    }

    async fn request_status(&self, message: Message, expected: MessageKind) -> Result<StatusResponse> {
        let response = self.send_message(&message, expected).await?;
        response.status().ok_or_else(|| HubError::UnexpectedResponse {
            expected,
            actual: response.kind(),
        })
    }

    fn register(&self, kind: MessageKind) -> (u64, oneshot::Receiver<Message>) {
        let id = self.next_waiter.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.state)
            .pending
            .entry(kind)
            .or_default()
            .push_back(Waiter { id, tx });
        (id, rx)
    }

    /// Hand `message` to the oldest live waiter. Gives it back if none.
    fn resolve(&self, kind: MessageKind, mut message: Message) -> Option<Message> {
        let mut state = lock(&self.state);
        let Some(queue) = state.pending.get_mut(&kind) else {
            return Some(message);
        };
        while let Some(waiter) = queue.pop_front() {
            match waiter.tx.send(message) {
                Ok(()) => {
                    if queue.is_empty() {
                        state.pending.remove(&kind);
                    }
                    return None;
                }
                // Caller went away; try the next one.
                Err(returned) => message = returned,
            }
        }
        state.pending.remove(&kind);
        Some(message)
    }

    async fn write_frame(&self, frame: &[u8]) -> Result<()> {
        let negotiated = lock(&self.state).info.map(|info| usize::from(info.max_packet_size));
        let packet_size = match negotiated {
            Some(size) if size > 0 => size,
            _ => frame.len().max(1),
        };

        let _writing = self.write_lock.lock().await;
        for fragment in frame.chunks(packet_size) {
            trace!(len = fragment.len(), "writing fragment");
            self.transport.write_bytes(fragment).await?;
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for HubClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("HubClient")
            .field("info", &state.info)
            .field("pending", &state.pending.values().map(VecDeque::len).sum::<usize>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Withdraws a waiter when its request ends early (write error, timeout,
/// dropped future). A no-op once the waiter was resolved.
struct PendingGuard<'a> {
    state: &'a Mutex<ConnectionState>,
    kind: MessageKind,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if let Some(queue) = state.pending.get_mut(&self.kind) {
            queue.retain(|waiter| waiter.id != self.id);
            if queue.is_empty() {
                state.pending.remove(&self.kind);
            }
        }
    }
}

fn lock(state: &Mutex<ConnectionState>) -> MutexGuard<'_, ConnectionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
