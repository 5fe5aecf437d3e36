//! Unregistration handler: withdraws every processor record a
//! connection registered.

use std::sync::Arc;

use bytes::Bytes;

use crate::codec::MsgPackCodec;
use crate::dispatch::{BoxFuture, Handler, HandlerResult};
use crate::error::Result;
use crate::protocol::{
    ResponseMessage, ResponseStatus, TpUnregisterRequest, TpUnregisterResponse,
};
use crate::registry::{ConnectionId, ProcessorRegistry};

/// Handles `TpUnregisterRequest` messages.
///
/// The request carries no fields; every record held by the sending
/// connection is removed, across all processor types. The transport's
/// disconnect path reaches the same outcome by calling
/// [`ProcessorRegistry::remove_connection`] directly.
pub struct UnregisterHandler {
    registry: Arc<ProcessorRegistry>,
}

impl UnregisterHandler {
    /// Create an unregistration handler over the shared registry.
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        Self { registry }
    }
}

impl Handler for UnregisterHandler {
    fn handle(
        &self,
        connection_id: ConnectionId,
        payload: Bytes,
    ) -> BoxFuture<'static, Result<HandlerResult>> {
        let registry = self.registry.clone();

        Box::pin(async move {
            let _request: TpUnregisterRequest = MsgPackCodec::decode(&payload)?;

            tracing::info!(
                "unregistering all transaction processor capabilities for connection {}",
                connection_id
            );

            // Zero removals is fine: the connection may never have
            // registered, or may have unregistered already.
            let removed = registry.remove_connection(&connection_id);
            tracing::debug!(
                "removed {} processor record(s) for connection {}",
                removed,
                connection_id
            );

            let ack = TpUnregisterResponse {
                status: ResponseStatus::Ok,
            };
            Ok(HandlerResult::Return(ResponseMessage::Unregister(ack)))
        })
    }
}
