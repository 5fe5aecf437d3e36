//! Handler contract between the transport layer and protocol handlers.
//!
//! The transport hands a handler the identity of the connection a
//! message arrived on plus the raw payload bytes; the handler returns a
//! typed outcome the transport acts on. Handlers keep no state between
//! invocations: everything they need arrives as arguments or lives in
//! shared state captured at construction (the processor registry).

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::ResponseMessage;
use crate::registry::ConnectionId;

/// Boxed future returned by handler invocations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of handling one inbound message.
#[derive(Debug, Clone)]
pub enum HandlerResult {
    /// Terminal response to serialize and send back on this connection.
    Return(ResponseMessage),
    /// Drop the message silently; no response is sent.
    Drop,
    /// Hand the message to a later handler in the chain.
    Pass,
}

/// A protocol message handler.
///
/// A decode failure is returned as an error and left to the transport
/// layer (which may close the connection or drop the message); it never
/// becomes a protocol-level response.
pub trait Handler: Send + Sync + 'static {
    /// Handle one message received on `connection_id`.
    fn handle(
        &self,
        connection_id: ConnectionId,
        payload: Bytes,
    ) -> BoxFuture<'static, Result<HandlerResult>>;
}
