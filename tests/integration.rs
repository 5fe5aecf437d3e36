//! Integration tests for prochub.
//!
//! Drives the dispatcher end to end: MsgPack-encoded requests in, typed
//! acknowledgments out, registry state checked between steps.

use std::sync::Arc;

use bytes::Bytes;

use prochub::{
    ConnectionId, Dispatcher, HandlerResult, HeaderStyle, MessageType, MsgPackCodec,
    ProcessorRegistry, ProcessorType, RegisterHandler, RequestHeaderStyle, ResponseMessage,
    ResponseStatus, TpRegisterRequest, TpRegisterResponse, TpUnregisterRequest,
    TpUnregisterResponse, UnregisterHandler, DEFAULT_MAX_OCCUPANCY, SDK_PROTOCOL_VERSION,
};

fn build_dispatcher(registry: Arc<ProcessorRegistry>) -> Dispatcher {
    let mut dispatcher = Dispatcher::default();
    dispatcher.add_handler(
        MessageType::TpRegisterRequest,
        Arc::new(RegisterHandler::new(registry.clone())),
    );
    dispatcher.add_handler(
        MessageType::TpUnregisterRequest,
        Arc::new(UnregisterHandler::new(registry)),
    );
    dispatcher
}

fn register_request(family: &str, version: &str) -> TpRegisterRequest {
    TpRegisterRequest {
        family: family.to_string(),
        version: version.to_string(),
        namespaces: vec!["1cf126".to_string()],
        max_occupancy: 0,
        request_header_style: RequestHeaderStyle::Unset,
        protocol_version: SDK_PROTOCOL_VERSION,
    }
}

async fn register(
    dispatcher: &Dispatcher,
    connection: &str,
    request: &TpRegisterRequest,
) -> TpRegisterResponse {
    let payload = Bytes::from(MsgPackCodec::encode(request).unwrap());
    let result = dispatcher
        .dispatch(
            ConnectionId::from(connection),
            MessageType::TpRegisterRequest,
            payload,
        )
        .await
        .unwrap();
    match result {
        HandlerResult::Return(ResponseMessage::Register(ack)) => ack,
        other => panic!("expected register response, got {:?}", other),
    }
}

async fn unregister(dispatcher: &Dispatcher, connection: &str) -> TpUnregisterResponse {
    let payload = Bytes::from(MsgPackCodec::encode(&TpUnregisterRequest::default()).unwrap());
    let result = dispatcher
        .dispatch(
            ConnectionId::from(connection),
            MessageType::TpUnregisterRequest,
            payload,
        )
        .await
        .unwrap();
    match result {
        HandlerResult::Return(ResponseMessage::Unregister(ack)) => ack,
        other => panic!("expected unregister response, got {:?}", other),
    }
}

/// A processor omitting its occupancy registers with the default and an
/// expanded header style.
#[tokio::test]
async fn test_register_with_defaults() {
    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = build_dispatcher(registry.clone());

    let ack = register(&dispatcher, "c1", &register_request("intkey", "1.0")).await;

    assert_eq!(ack.status, ResponseStatus::Ok);
    assert_eq!(ack.protocol_version, SDK_PROTOCOL_VERSION);

    let records = registry.processors_for(&ProcessorType::new("intkey", "1.0"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].connection_id.as_str(), "c1");
    assert_eq!(records[0].max_occupancy, DEFAULT_MAX_OCCUPANCY);
    assert_eq!(records[0].header_style, HeaderStyle::Expanded);
}

/// A request built by a newer SDK is rejected with the validator's
/// version and leaves the registry exactly as it was.
#[tokio::test]
async fn test_newer_protocol_version_rejected() {
    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = build_dispatcher(registry.clone());

    register(&dispatcher, "c1", &register_request("intkey", "1.0")).await;

    let mut request = register_request("intkey", "1.0");
    request.protocol_version = 2;
    let ack = register(&dispatcher, "c2", &request).await;

    assert_eq!(ack.status, ResponseStatus::Error);
    assert_eq!(ack.protocol_version, SDK_PROTOCOL_VERSION);

    let records = registry.processors_for(&ProcessorType::new("intkey", "1.0"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].connection_id.as_str(), "c1");
}

/// Unregistering removes the connection's records and later lookups no
/// longer see them.
#[tokio::test]
async fn test_register_then_unregister() {
    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = build_dispatcher(registry.clone());

    register(&dispatcher, "c1", &register_request("intkey", "1.0")).await;
    register(&dispatcher, "c2", &register_request("intkey", "1.0")).await;

    let ack = unregister(&dispatcher, "c1").await;
    assert_eq!(ack.status, ResponseStatus::Ok);

    let records = registry.processors_for(&ProcessorType::new("intkey", "1.0"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].connection_id.as_str(), "c2");
}

/// Unregistering a connection that never registered is acknowledged.
#[tokio::test]
async fn test_unregister_without_registration() {
    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = build_dispatcher(registry.clone());

    let ack = unregister(&dispatcher, "c1").await;

    assert_eq!(ack.status, ResponseStatus::Ok);
    assert!(registry.is_empty());
}

/// A payload produced by an SDK predating the occupancy, header-style
/// and protocol-version fields still registers correctly.
#[tokio::test]
async fn test_legacy_payload_registers_with_defaults() {
    #[derive(serde::Serialize)]
    struct LegacyRegisterRequest {
        family: String,
        version: String,
        namespaces: Vec<String>,
    }

    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = build_dispatcher(registry.clone());

    let legacy = LegacyRegisterRequest {
        family: "xo".to_string(),
        version: "1.0".to_string(),
        namespaces: vec!["5b7349".to_string()],
    };
    let payload = Bytes::from(MsgPackCodec::encode(&legacy).unwrap());

    let result = dispatcher
        .dispatch(
            ConnectionId::from("legacy"),
            MessageType::TpRegisterRequest,
            payload,
        )
        .await
        .unwrap();

    let ack = match result {
        HandlerResult::Return(ResponseMessage::Register(ack)) => ack,
        other => panic!("expected register response, got {:?}", other),
    };
    assert_eq!(ack.status, ResponseStatus::Ok);

    let records = registry.processors_for(&ProcessorType::new("xo", "1.0"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].max_occupancy, DEFAULT_MAX_OCCUPANCY);
    assert_eq!(records[0].header_style, HeaderStyle::Expanded);
}

/// A message type nothing was registered for is a dispatch error, not a
/// protocol response.
#[tokio::test]
async fn test_unhandled_message_type() {
    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = build_dispatcher(registry);

    let result = dispatcher
        .dispatch(
            ConnectionId::from("c1"),
            MessageType::TpRegisterResponse,
            Bytes::new(),
        )
        .await;

    assert!(result.is_err());
}

/// Concurrent registrations from many connections followed by their
/// unregistrations leave the registry empty, with no partial state.
#[tokio::test]
async fn test_concurrent_connections() {
    let registry = Arc::new(ProcessorRegistry::new());
    let dispatcher = Arc::new(build_dispatcher(registry.clone()));

    let mut tasks = Vec::new();
    for worker in 0..16 {
        let dispatcher = dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            let connection = format!("conn-{}", worker);
            for round in 0..8 {
                let request = register_request(&format!("family-{}", round % 3), "1.0");
                let ack = register(&dispatcher, &connection, &request).await;
                assert_eq!(ack.status, ResponseStatus::Ok);
            }
            let ack = unregister(&dispatcher, &connection).await;
            assert_eq!(ack.status, ResponseStatus::Ok);
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert!(registry.is_empty());
}
