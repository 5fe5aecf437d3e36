//! Dispatch module - routing inbound messages to protocol handlers.
//!
//! Provides:
//! - [`Handler`] - the contract a protocol handler implements
//! - [`HandlerResult`] - the typed outcome the transport acts on
//! - [`Dispatcher`] - maps message types to handlers
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use prochub::dispatch::{DispatchConfig, Dispatcher};
//! use prochub::handlers::RegisterHandler;
//! use prochub::protocol::MessageType;
//!
//! let mut dispatcher = Dispatcher::new(DispatchConfig::default());
//! dispatcher.add_handler(
//!     MessageType::TpRegisterRequest,
//!     Arc::new(RegisterHandler::new(registry)),
//! );
//! ```

mod dispatcher;
mod handler;

pub use dispatcher::{DispatchConfig, Dispatcher, DEFAULT_MAX_CONCURRENT_HANDLERS};
pub use handler::{BoxFuture, Handler, HandlerResult};
