//! Message-type based dispatch to registered handlers.
//!
//! The transport decodes an envelope into `(connection, message type,
//! payload)` and calls [`Dispatcher::dispatch`]; the dispatcher routes
//! to the handler registered for that type and hands the outcome back
//! for the transport to act on.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Semaphore;

use super::handler::{Handler, HandlerResult};
use crate::error::{ProchubError, Result};
use crate::protocol::MessageType;
use crate::registry::ConnectionId;

/// Default maximum concurrent handler invocations.
pub const DEFAULT_MAX_CONCURRENT_HANDLERS: usize = 256;

/// Configuration for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum handler invocations in flight at once. At the limit,
    /// further messages are dropped with a warning.
    /// Default: 256
    pub max_concurrent_handlers: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_handlers: DEFAULT_MAX_CONCURRENT_HANDLERS,
        }
    }
}

/// Routes inbound messages to the handler registered for their type.
pub struct Dispatcher {
    handlers: HashMap<MessageType, Arc<dyn Handler>>,
    semaphore: Semaphore,
}

impl Dispatcher {
    /// Create a dispatcher with the given configuration.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            handlers: HashMap::new(),
            semaphore: Semaphore::new(config.max_concurrent_handlers),
        }
    }

    /// Register the handler invoked for `message_type`.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn add_handler(&mut self, message_type: MessageType, handler: Arc<dyn Handler>) {
        self.handlers.insert(message_type, handler);
    }

    /// Dispatch one message to its handler and await the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ProchubError::HandlerNotFound`] when no handler is
    /// registered for the message type, or whatever error the handler
    /// itself produced (typically a decode failure).
    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        message_type: MessageType,
        payload: Bytes,
    ) -> Result<HandlerResult> {
        let handler = self
            .handlers
            .get(&message_type)
            .ok_or(ProchubError::HandlerNotFound(message_type))?;

        // Permit is held until the handler finishes.
        let _permit = match self.semaphore.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(
                    "handler capacity reached, dropping {} from connection {}",
                    message_type,
                    connection_id
                );
                return Ok(HandlerResult::Drop);
            }
        };

        handler.handle(connection_id, payload).await
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ResponseMessage, ResponseStatus, TpUnregisterResponse};

    struct AckHandler;

    impl Handler for AckHandler {
        fn handle(
            &self,
            _connection_id: ConnectionId,
            _payload: Bytes,
        ) -> crate::dispatch::BoxFuture<'static, Result<HandlerResult>> {
            Box::pin(async {
                Ok(HandlerResult::Return(ResponseMessage::Unregister(
                    TpUnregisterResponse {
                        status: ResponseStatus::Ok,
                    },
                )))
            })
        }
    }

    #[test]
    fn test_dispatch_config_default() {
        let config = DispatchConfig::default();
        assert_eq!(
            config.max_concurrent_handlers,
            DEFAULT_MAX_CONCURRENT_HANDLERS
        );
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_registered_handler() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.add_handler(MessageType::TpUnregisterRequest, Arc::new(AckHandler));

        let result = dispatcher
            .dispatch(
                ConnectionId::from("c1"),
                MessageType::TpUnregisterRequest,
                Bytes::new(),
            )
            .await
            .unwrap();

        assert!(matches!(result, HandlerResult::Return(_)));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_type_fails() {
        let dispatcher = Dispatcher::default();

        let result = dispatcher
            .dispatch(
                ConnectionId::from("c1"),
                MessageType::TpRegisterRequest,
                Bytes::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ProchubError::HandlerNotFound(MessageType::TpRegisterRequest))
        ));
    }

    #[tokio::test]
    async fn test_dispatch_at_capacity_drops() {
        let mut dispatcher = Dispatcher::new(DispatchConfig {
            max_concurrent_handlers: 0,
        });
        dispatcher.add_handler(MessageType::TpUnregisterRequest, Arc::new(AckHandler));

        let result = dispatcher
            .dispatch(
                ConnectionId::from("c1"),
                MessageType::TpUnregisterRequest,
                Bytes::new(),
            )
            .await
            .unwrap();

        assert!(matches!(result, HandlerResult::Drop));
    }
}
