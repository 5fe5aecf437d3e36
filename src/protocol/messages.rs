//! Wire messages for the processor registration protocol.
//!
//! Field-level compatibility matters here. Requests are decoded from
//! MsgPack maps, and every field an older SDK may omit carries a serde
//! default, so an absent field decodes the same as an explicit zero
//! value. The registration policy then resolves those zeros.

use serde::{Deserialize, Serialize};

use crate::codec::MsgPackCodec;
use crate::error::{ProchubError, Result};

/// Tag identifying each message crossing the dispatch boundary.
///
/// The transport layer stamps this on every envelope; the dispatcher
/// routes on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    TpRegisterRequest = 1,
    TpRegisterResponse = 2,
    TpUnregisterRequest = 3,
    TpUnregisterResponse = 4,
}

impl MessageType {
    /// Wire discriminant for this message type.
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageType::TpRegisterRequest => "TP_REGISTER_REQUEST",
            MessageType::TpRegisterResponse => "TP_REGISTER_RESPONSE",
            MessageType::TpUnregisterRequest => "TP_UNREGISTER_REQUEST",
            MessageType::TpUnregisterResponse => "TP_UNREGISTER_RESPONSE",
        };
        f.write_str(name)
    }
}

impl TryFrom<u16> for MessageType {
    type Error = ProchubError;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(MessageType::TpRegisterRequest),
            2 => Ok(MessageType::TpRegisterResponse),
            3 => Ok(MessageType::TpUnregisterRequest),
            4 => Ok(MessageType::TpUnregisterResponse),
            other => Err(ProchubError::Protocol(format!(
                "unknown message type tag: {}",
                other
            ))),
        }
    }
}

/// Header style requested at registration time.
///
/// `Unset` is what pre-style SDK encodings decode to; it is resolved to
/// a concrete [`HeaderStyle`] before a record is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestHeaderStyle {
    Unset,
    Expanded,
    Raw,
}

impl Default for RequestHeaderStyle {
    fn default() -> Self {
        RequestHeaderStyle::Unset
    }
}

impl RequestHeaderStyle {
    /// Resolve to the style stored in a processor record.
    ///
    /// `Unset` maps to `Expanded`, preserving the behavior clients got
    /// before the style field existed.
    pub fn resolve(self) -> HeaderStyle {
        match self {
            RequestHeaderStyle::Unset | RequestHeaderStyle::Expanded => HeaderStyle::Expanded,
            RequestHeaderStyle::Raw => HeaderStyle::Raw,
        }
    }
}

/// Header style stored in a processor record: whether dispatched work
/// headers are sent pre-parsed (`Expanded`) or as raw bytes (`Raw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    Expanded,
    Raw,
}

/// Status carried by registration acknowledgments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Registration request sent by a transaction processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TpRegisterRequest {
    /// Named category of work this processor handles (e.g. "intkey").
    pub family: String,
    /// Version of the family implementation.
    pub version: String,
    /// Address prefixes this processor claims authority over.
    #[serde(default)]
    pub namespaces: Vec<String>,
    /// Maximum concurrent units of work; 0 means "use the default".
    #[serde(default)]
    pub max_occupancy: u32,
    /// Requested header style; absent in pre-style SDK encodings.
    #[serde(default)]
    pub request_header_style: RequestHeaderStyle,
    /// Protocol version the SDK was built against.
    #[serde(default)]
    pub protocol_version: u32,
}

/// Acknowledgment for a registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TpRegisterResponse {
    pub status: ResponseStatus,
    /// Always the validator's supported version, regardless of status,
    /// so the SDK can cross check what it requested against what it
    /// will get.
    pub protocol_version: u32,
}

/// Request to withdraw every registration held by the sending
/// connection. Carries no fields; the sender is identified by its
/// connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TpUnregisterRequest {}

/// Acknowledgment for an unregistration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TpUnregisterResponse {
    pub status: ResponseStatus,
}

/// A typed response produced by a handler, ready for the transport
/// layer to serialize and send back on the originating connection.
#[derive(Debug, Clone)]
pub enum ResponseMessage {
    Register(TpRegisterResponse),
    Unregister(TpUnregisterResponse),
}

impl ResponseMessage {
    /// Message tag the transport should stamp on the outgoing envelope.
    pub fn message_type(&self) -> MessageType {
        match self {
            ResponseMessage::Register(_) => MessageType::TpRegisterResponse,
            ResponseMessage::Unregister(_) => MessageType::TpUnregisterResponse,
        }
    }

    /// Serialize the response payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            ResponseMessage::Register(ack) => MsgPackCodec::encode(ack),
            ResponseMessage::Unregister(ack) => MsgPackCodec::encode(ack),
        }
    }
}
