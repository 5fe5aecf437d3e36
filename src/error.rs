//! Error types for prochub.

use thiserror::Error;

use crate::protocol::MessageType;

/// Main error type for all registration-protocol operations.
#[derive(Debug, Error)]
pub enum ProchubError {
    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Protocol error (unknown message tag, malformed envelope, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No handler registered for the given message type.
    #[error("Handler not found for message type: {0}")]
    HandlerNotFound(MessageType),
}

/// Result type alias using ProchubError.
pub type Result<T> = std::result::Result<T, ProchubError>;
