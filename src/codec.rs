//! MsgPack codec for protocol messages using `rmp-serde`.
//!
//! **Always `to_vec_named`, never `to_vec`**: the named (struct-as-map)
//! format keeps field names on the wire. Registration requests encoded by
//! older SDKs omit fields that did not exist yet (`max_occupancy`,
//! `request_header_style`, `protocol_version`), and decoding fills those
//! from serde defaults only when fields are looked up by name. Positional
//! (array) encoding would break that compatibility contract.
//!
//! # Example
//!
//! ```
//! use prochub::codec::MsgPackCodec;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     id: u32,
//!     content: String,
//! }
//!
//! let msg = Message { id: 42, content: "hello".to_string() };
//! let encoded = MsgPackCodec::encode(&msg).unwrap();
//! let decoded: Message = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use crate::error::Result;

/// MessagePack codec for structured protocol data.
///
/// Uses `rmp_serde::to_vec_named` so structs are serialized as maps keyed
/// by field name rather than positional arrays.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
