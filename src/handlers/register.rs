//! Registration handler: admits a transaction processor into the pool
//! of routable workers.

use std::sync::Arc;

use bytes::Bytes;

use crate::codec::MsgPackCodec;
use crate::dispatch::{BoxFuture, Handler, HandlerResult};
use crate::error::Result;
use crate::protocol::{
    ResponseMessage, ResponseStatus, TpRegisterRequest, TpRegisterResponse,
};
use crate::registry::{ConnectionId, Processor, ProcessorRegistry, ProcessorType};

/// Occupancy assigned when a processor does not declare one.
pub const DEFAULT_MAX_OCCUPANCY: u32 = 10;

/// Protocol version this validator supports. SDKs compare against it to
/// check whether the features they requested during registration are
/// available. Increment only when `TpRegisterRequest` changes in a way
/// that affects negotiation, and keep client SDKs in sync.
pub const SDK_PROTOCOL_VERSION: u32 = 1;

/// Handles `TpRegisterRequest` messages.
pub struct RegisterHandler {
    registry: Arc<ProcessorRegistry>,
}

impl RegisterHandler {
    /// Create a registration handler over the shared registry.
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        Self { registry }
    }
}

impl Handler for RegisterHandler {
    fn handle(
        &self,
        connection_id: ConnectionId,
        payload: Bytes,
    ) -> BoxFuture<'static, Result<HandlerResult>> {
        let registry = self.registry.clone();

        Box::pin(async move {
            let request: TpRegisterRequest = MsgPackCodec::decode(&payload)?;

            let max_occupancy = if request.max_occupancy == 0 {
                tracing::warn!(
                    "max occupancy was not provided by transaction processor {}, \
                     using default max occupancy {}",
                    connection_id,
                    DEFAULT_MAX_OCCUPANCY
                );
                DEFAULT_MAX_OCCUPANCY
            } else {
                request.max_occupancy
            };

            // Pre-style SDK encodings decode to Unset; stored records
            // always carry a concrete style.
            let header_style = request.request_header_style.resolve();

            // The validator is backward compatible with every protocol
            // version up to its own; anything newer is rejected, carrying
            // the supported version so the SDK can react.
            if request.protocol_version > SDK_PROTOCOL_VERSION {
                tracing::warn!(
                    "rejecting registration from {}: requested protocol version {} \
                     exceeds supported version {}",
                    connection_id,
                    request.protocol_version,
                    SDK_PROTOCOL_VERSION
                );
                let ack = TpRegisterResponse {
                    status: ResponseStatus::Error,
                    protocol_version: SDK_PROTOCOL_VERSION,
                };
                return Ok(HandlerResult::Return(ResponseMessage::Register(ack)));
            }

            let TpRegisterRequest {
                family,
                version,
                namespaces,
                ..
            } = request;

            let processor_type = ProcessorType::new(family.clone(), version.clone());
            let processor = Processor::new(
                connection_id.clone(),
                namespaces.clone(),
                max_occupancy,
                header_style,
            );
            registry.insert(processor_type, processor);

            tracing::info!(
                "registered transaction processor: connection_id={}, family={}, \
                 version={}, namespaces={:?}, max_occupancy={}",
                connection_id,
                family,
                version,
                namespaces,
                max_occupancy
            );

            let ack = TpRegisterResponse {
                status: ResponseStatus::Ok,
                protocol_version: SDK_PROTOCOL_VERSION,
            };
            Ok(HandlerResult::Return(ResponseMessage::Register(ack)))
        })
    }
}
