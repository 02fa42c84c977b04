//! Payload codecs for carrying wire messages over byte-oriented transports.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors raised while selecting a codec or converting payloads.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },
    #[error("unknown codec: {name}")]
    UnknownCodec { name: String },
    #[error("failed to encode payload: {0}")]
    Encode(String),
    #[error("failed to decode payload: {0}")]
    Decode(String),
}

/// Serialization format of an RPC payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireCodec {
    #[default]
    Json,
    /// Named `MsgPack` (maps keyed by field name).
    MsgPack,
}

impl WireCodec {
    pub const JSON_CONTENT_TYPE: &'static str = "application/json";
    pub const MSGPACK_CONTENT_TYPE: &'static str = "application/msgpack";

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => Self::JSON_CONTENT_TYPE,
            Self::MsgPack => Self::MSGPACK_CONTENT_TYPE,
        }
    }

    /// Selects a codec from a `Content-Type` header value.
    ///
    /// A missing header selects JSON. Media type parameters (`; charset=...`)
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnsupportedContentType` for any other media type.
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, CodecError> {
        let Some(raw) = content_type else {
            return Ok(Self::Json);
        };
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "" | Self::JSON_CONTENT_TYPE => Ok(Self::Json),
            Self::MSGPACK_CONTENT_TYPE | "application/x-msgpack" => Ok(Self::MsgPack),
            _ => Err(CodecError::UnsupportedContentType {
                content_type: raw.to_string(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `CodecError::Encode` if the value cannot be serialized.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string())),
            Self::MsgPack => {
                rmp_serde::to_vec_named(value).map_err(|e| CodecError::Encode(e.to_string()))
            }
        }
    }

    /// # Errors
    ///
    /// Returns `CodecError::Decode` if the bytes are not a valid `T`.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            Self::Json => {
                serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
            }
            Self::MsgPack => {
                rmp_serde::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
            }
        }
    }
}

impl fmt::Display for WireCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::MsgPack => f.write_str("msgpack"),
        }
    }
}

impl FromStr for WireCodec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "msgpack" => Ok(Self::MsgPack),
            _ => Err(CodecError::UnknownCodec {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{CreateMovementRequest, ListMovementsResponse};

    #[test]
    fn missing_content_type_defaults_to_json() {
        assert_eq!(WireCodec::from_content_type(None).unwrap(), WireCodec::Json);
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        assert_eq!(
            WireCodec::from_content_type(Some("application/json; charset=utf-8")).unwrap(),
            WireCodec::Json
        );
        assert_eq!(
            WireCodec::from_content_type(Some("Application/MsgPack")).unwrap(),
            WireCodec::MsgPack
        );
        assert_eq!(
            WireCodec::from_content_type(Some("application/x-msgpack")).unwrap(),
            WireCodec::MsgPack
        );
    }

    #[test]
    fn unsupported_content_type_is_rejected() {
        let err = WireCodec::from_content_type(Some("text/plain")).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedContentType { content_type } if content_type == "text/plain"
        ));
    }

    #[test]
    fn msgpack_payload_decodes_with_field_names() {
        let req = CreateMovementRequest {
            tenant_id: "t1".to_string(),
            name: "deadlift".to_string(),
            category_id: "c1".to_string(),
        };
        let bytes = WireCodec::MsgPack.encode(&req).unwrap();
        let decoded: CreateMovementRequest = WireCodec::MsgPack.decode(&bytes).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = WireCodec::Json
            .decode::<ListMovementsResponse>(b"{not json")
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn codec_names_parse() {
        assert_eq!("json".parse::<WireCodec>().unwrap(), WireCodec::Json);
        assert_eq!("MsgPack".parse::<WireCodec>().unwrap(), WireCodec::MsgPack);
        assert!("xml".parse::<WireCodec>().is_err());
        assert_eq!(WireCodec::MsgPack.to_string(), "msgpack");
        assert_eq!(WireCodec::MsgPack.content_type(), "application/msgpack");
    }
}
