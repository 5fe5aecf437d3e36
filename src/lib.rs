//! # prochub
//!
//! Validator-side registration hub for transaction processors.
//!
//! External worker processes ("transaction processors") announce
//! themselves over a connection; the handlers here decode the
//! announcement, apply the defaulting and protocol-version policy, and
//! install a routing record into the shared [`ProcessorRegistry`].
//!
//! ## Architecture
//!
//! - **Protocol**: MsgPack-encoded messages with backward-compatible
//!   field defaulting
//! - **Dispatch**: message-type routing to [`Handler`] implementations
//!   returning a typed [`HandlerResult`]
//! - **Registry**: concurrency-safe multimap from `(family, version)`
//!   to processor records, purged per connection
//!
//! Byte-level transport and actual work dispatch to registered
//! processors live outside this crate; the transport feeds
//! [`Dispatcher::dispatch`] and serializes whatever the handler returns.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use prochub::{Dispatcher, MessageType, ProcessorRegistry, RegisterHandler, UnregisterHandler};
//!
//! let registry = Arc::new(ProcessorRegistry::new());
//! let mut dispatcher = Dispatcher::default();
//! dispatcher.add_handler(
//!     MessageType::TpRegisterRequest,
//!     Arc::new(RegisterHandler::new(registry.clone())),
//! );
//! dispatcher.add_handler(
//!     MessageType::TpUnregisterRequest,
//!     Arc::new(UnregisterHandler::new(registry.clone())),
//! );
//!
//! // transport read loop:
//! let result = dispatcher.dispatch(connection_id, message_type, payload).await?;
//! ```

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod registry;

pub use codec::MsgPackCodec;
pub use dispatch::{DispatchConfig, Dispatcher, Handler, HandlerResult};
pub use error::ProchubError;
pub use handlers::{RegisterHandler, UnregisterHandler, DEFAULT_MAX_OCCUPANCY, SDK_PROTOCOL_VERSION};
pub use protocol::{
    HeaderStyle, MessageType, RequestHeaderStyle, ResponseMessage, ResponseStatus,
    TpRegisterRequest, TpRegisterResponse, TpUnregisterRequest, TpUnregisterResponse,
};
pub use registry::{ConnectionId, Processor, ProcessorRegistry, ProcessorType};
