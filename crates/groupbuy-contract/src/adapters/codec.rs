//! # Message Codec
//!
//! JSON decoding of incoming messages and encoding of answers at the host
//! boundary.

use crate::errors::CodecError;
use crate::messages::{ExecuteMsg, QueryMsg};
use serde::Serialize;

/// Stateless JSON codec for boundary messages.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageCodec;

impl MessageCodec {
    /// Decodes an execute message.
    ///
    /// # Errors
    /// `CodecError::Malformed` on invalid JSON or an unknown action.
    pub fn decode_execute(bytes: &[u8]) -> Result<ExecuteMsg, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    /// Decodes a query message.
    ///
    /// # Errors
    /// `CodecError::Malformed` on invalid JSON or an unknown query.
    pub fn decode_query(bytes: &[u8]) -> Result<QueryMsg, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    /// Encodes an answer.
    ///
    /// # Errors
    /// `CodecError::Encoding` if serialization fails.
    pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{ExecuteAnswer, ResponseStatus};

    #[test]
    fn test_decode_execute() {
        let msg = MessageCodec::decode_execute(br#"{"set_viewing_key":{"key":"k"}}"#).unwrap();
        assert_eq!(msg.action_name(), "set_viewing_key");
    }

    #[test]
    fn test_decode_rejects_unknown_action() {
        let err = MessageCodec::decode_execute(br#"{"mint":{}}"#).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
        assert!(MessageCodec::decode_query(b"not json").is_err());
    }

    #[test]
    fn test_decode_rejects_numeric_amount() {
        let json = br#"{"add_item":{"name":"n","category":"c","url":"u","img_url":"i",
            "seller_address":"s","seller_email":"e","price":1000,"wanted_price":"900",
            "group_size_goal":10}}"#;
        assert!(MessageCodec::decode_execute(json).is_err());
    }

    #[test]
    fn test_encode_answer() {
        let bytes = MessageCodec::encode(&ExecuteAnswer::AddItem {
            status: ResponseStatus::Success,
        })
        .unwrap();
        assert_eq!(bytes, br#"{"add_item":{"status":"success"}}"#.to_vec());
    }
}
