mod common;

use std::sync::Arc;
use std::time::Duration;

use hublink_client::{ClientConfig, Dispatch, HubClient, HubError, HubEvent};
use hublink_frame::pack;
use hublink_proto::{
    ConsoleNotification, Message, MessageKind, ProgramFlowRequest, StatusResponse,
    TransferChunkRequest,
};
use tokio::io::AsyncWriteExt;

use common::{healthy_hub, info, start};

fn quick() -> ClientConfig {
    ClientConfig {
        response_timeout: Some(Duration::from_secs(5)),
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn negotiate_stores_device_info() {
    let harness = start(quick(), healthy_hub(info(20, 256)));
    let client = &harness.client;

    let negotiated = client.negotiate().await.expect("negotiate should succeed");

    assert_eq!(negotiated, info(20, 256));
    assert!(client.is_negotiated());
    assert_eq!(client.firmware_version().as_deref(), Some("1.6.62"));
    assert_eq!(client.protocol_version().as_deref(), Some("1.0.0"));
    assert_eq!(client.max_chunk_size(), Some(256));
    assert_eq!(harness.requests(), vec![Message::InfoRequest]);
}

#[tokio::test]
async fn first_request_is_written_whole() {
    let harness = start(quick(), healthy_hub(info(4, 256)));

    harness.client.negotiate().await.expect("negotiate should succeed");

    let writes = harness.client.transport().writes();
    assert_eq!(writes, vec![pack(&[0x00]).to_vec()]);
}

#[tokio::test]
async fn frames_are_split_to_packet_size() {
    let harness = start(quick(), healthy_hub(info(8, 256)));
    let client = &harness.client;
    client.negotiate().await.expect("negotiate should succeed");

    let chunk = vec![0x42u8; 40];
    client
        .transfer_chunk(&chunk, 0x1234_5678)
        .await
        .expect("chunk should be acknowledged");

    let request = Message::from(TransferChunkRequest::new(0x1234_5678, chunk).expect("valid chunk"));
    let expected = pack(&request.encode());

    let writes = client.transport().writes();
    let fragments = &writes[1..];
    assert!(fragments.len() > 1);
    assert!(fragments.iter().all(|fragment| fragment.len() <= 8));
    assert_eq!(fragments.concat(), expected.to_vec());
}

#[tokio::test]
async fn zero_packet_size_means_unlimited() {
    let harness = start(quick(), healthy_hub(info(0, 256)));
    let client = &harness.client;
    client.negotiate().await.expect("negotiate should succeed");

    assert!(client.start_stop_program(1, false).await.expect("acknowledged"));
    assert_eq!(client.transport().writes().len(), 2);
}

#[tokio::test]
async fn responses_resolve_independently_of_arrival_order() {
    // Hold the program-flow request until the info request arrives, then
    // answer the info request first.
    let mut held = false;
    let script: common::Script = Box::new(move |request| match request {
        Message::ProgramFlowRequest(_) => {
            held = true;
            Vec::new()
        }
        Message::InfoRequest if held => vec![
            Message::InfoResponse(info(64, 128)),
            Message::ProgramFlowResponse(StatusResponse::nack(1)),
        ],
        _ => Vec::new(),
    });
    let harness = start(quick(), script);
    let client = &harness.client;

    let (flow, negotiated) = tokio::join!(client.start_stop_program(2, true), client.negotiate());

    assert!(!flow.expect("program flow should be answered"));
    assert_eq!(negotiated.expect("negotiate should succeed"), info(64, 128));
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn same_kind_requests_resolve_oldest_first() {
    // Status equals slot, so only slot 0 is acknowledged.
    let script: common::Script = Box::new(|request| match request {
        Message::ProgramFlowRequest(ProgramFlowRequest { slot, .. }) => {
            vec![Message::ProgramFlowResponse(StatusResponse::nack(*slot))]
        }
        _ => Vec::new(),
    });
    let harness = start(quick(), script);
    let client = &harness.client;

    let (first, second) = tokio::join!(
        client.start_stop_program(0, false),
        client.start_stop_program(1, false)
    );

    assert!(first.expect("first answered"));
    assert!(!second.expect("second answered"));
}

#[tokio::test]
async fn notification_reaches_subscribers_not_waiters() {
    let harness = start(quick(), Box::new(|_| Vec::new()));
    let client = &harness.client;
    let mut events = client.subscribe();

    let dispatch = client.on_bytes_received(&pack(&[0x20, 0x00]));

    assert_eq!(dispatch, Dispatch::ProgramRunningChanged(true));
    assert_eq!(
        events.recv().await.expect("event"),
        HubEvent::ProgramRunningChanged(true)
    );
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn console_text_and_decode_errors_reach_logger() {
    let harness = start(quick(), Box::new(|_| Vec::new()));
    let client = &harness.client;

    let console = Message::from(ConsoleNotification::new("Hello from the hub"));
    assert_eq!(client.on_bytes_received(&pack(&console.encode())), Dispatch::Console);
    assert_eq!(client.on_bytes_received(&pack(&[0x55, 0x01])), Dispatch::Dropped);

    let lines = harness.logger.lines();
    assert_eq!(lines[0], ("log", "Hello from the hub".to_owned()));
    assert_eq!(lines[1].0, "error");
    assert!(lines[1].1.contains("0x55"), "{}", lines[1].1);
}

#[tokio::test]
async fn close_fails_pending_requests() {
    let harness = start(quick(), healthy_hub(info(20, 256)));
    let client = Arc::clone(&harness.client);
    client.negotiate().await.expect("negotiate should succeed");

    // Nothing answers a request kind the hub never sends.
    let waiting = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .send_message(&Message::InfoRequest, MessageKind::ConsoleNotification)
                .await
        })
    };
    while client.pending_requests() == 0 {
        tokio::task::yield_now().await;
    }

    let mut events = client.subscribe();
    client.on_closed();

    let result = waiting.await.expect("task should finish");
    assert!(matches!(result, Err(HubError::ConnectionClosed)));
    assert_eq!(events.recv().await.expect("event"), HubEvent::Closed);
    assert!(!client.is_negotiated());
    assert_eq!(client.max_chunk_size(), None);
}

#[tokio::test]
async fn timeout_withdraws_the_waiter() {
    let config = ClientConfig {
        response_timeout: Some(Duration::from_millis(30)),
        ..ClientConfig::default()
    };
    let harness = start(config, Box::new(|_| Vec::new()));

    let err = harness
        .client
        .negotiate()
        .await
        .expect_err("silent hub should time out");

    assert!(matches!(
        err,
        HubError::Timeout {
            kind: MessageKind::InfoResponse,
            ..
        }
    ));
    assert_eq!(harness.client.pending_requests(), 0);

    // A late answer now has nobody to go to.
    let late = Message::InfoResponse(info(20, 20));
    assert_eq!(
        harness.client.on_bytes_received(&pack(&late.encode())),
        Dispatch::Ignored(MessageKind::InfoResponse)
    );
}

#[tokio::test]
async fn reader_pump_dispatches_and_reports_close() {
    let client = Arc::new(HubClient::new(hublink_transport::IoTransport::new(tokio::io::sink())));
    let mut events = client.subscribe();
    let (mut device, host) = tokio::io::duplex(64);

    let pump = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.run_reader(host).await })
    };

    // Line noise, then a notification split across writes.
    let frame = pack(&[0x20, 0x01]);
    device.write_all(&[0x07, 0x02]).await.expect("write noise");
    device.write_all(&frame[..1]).await.expect("write head");
    device.write_all(&frame[1..]).await.expect("write tail");
    drop(device);

    pump.await
        .expect("pump task should finish")
        .expect("EOF is a clean close");

    assert_eq!(
        events.recv().await.expect("event"),
        HubEvent::ProgramRunningChanged(false)
    );
    assert_eq!(events.recv().await.expect("event"), HubEvent::Closed);
}

#[tokio::test]
async fn late_response_goes_to_next_waiter_of_same_kind() {
    let config = ClientConfig {
        response_timeout: Some(Duration::from_millis(250)),
        ..ClientConfig::default()
    };
    let harness = start(config, Box::new(|_| Vec::new()));
    let client = Arc::clone(&harness.client);

    let err = client
        .start_stop_program(1, false)
        .await
        .expect_err("silent hub should time out");
    assert!(matches!(err, HubError::Timeout { .. }));

    let retry = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.start_stop_program(1, false).await })
    };
    while client.pending_requests() == 0 {
        tokio::task::yield_now().await;
    }

    // The answer to the first attempt arrives now.
    let late = Message::ProgramFlowResponse(StatusResponse::nack(7));
    assert_eq!(
        client.on_bytes_received(&pack(&late.encode())),
        Dispatch::Resolved(MessageKind::ProgramFlowResponse)
    );
    let acknowledged = retry
        .await
        .expect("task should finish")
        .expect("retry takes the late response");
    assert!(!acknowledged);
}
