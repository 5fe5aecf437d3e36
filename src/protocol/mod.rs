//! Protocol module - wire messages and message-type tags.
//!
//! This module defines the typed contract between transaction
//! processors and the validator:
//! - Request/response message structs with backward-compatible
//!   field defaulting
//! - Message-type tags the dispatcher routes on
//! - Header-style normalization applied at admission

mod messages;

pub use messages::{
    HeaderStyle, MessageType, RequestHeaderStyle, ResponseMessage, ResponseStatus,
    TpRegisterRequest, TpRegisterResponse, TpUnregisterRequest, TpUnregisterResponse,
};
