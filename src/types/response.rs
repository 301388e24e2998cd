//! Upstream response payloads

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A decoded upstream body.
///
/// Bodies that parse as JSON are kept as [`Structured`](Self::Structured).
/// Anything else degrades to [`Raw`](Self::Raw) text; a malformed body is
/// never an error. On the wire the raw form is `{"raw": "<text>"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    Structured(serde_json::Value),
    Raw(String),
}

impl ResponseValue {
    /// Decode a response body, falling back to lossy UTF-8 text.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => ResponseValue::Structured(value),
            Err(_) => ResponseValue::Raw(String::from_utf8_lossy(body).into_owned()),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ResponseValue::Raw(_))
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseValue::Structured(v) => Some(v),
            ResponseValue::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ResponseValue::Raw(s) => Some(s),
            ResponseValue::Structured(_) => None,
        }
    }

    /// JSON form as seen by tool callers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResponseValue::Structured(v) => v.clone(),
            ResponseValue::Raw(s) => serde_json::json!({ "raw": s }),
        }
    }
}

impl Serialize for ResponseValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResponseValue::Structured(v) => v.serialize(serializer),
            ResponseValue::Raw(s) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("raw", s)?;
                map.end()
            }
        }
    }
}
