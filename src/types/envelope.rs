//! Tool result envelopes.
//!
//! Successful calls answer `{"ok": true, "data": ...}`; caller-input
//! problems answer `{"error": {"code": ..., "message": ...}}`. Upstream
//! exhaustion is not an envelope at all; it surfaces as an `Err`.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::ResponseValue;
use crate::PediaError;

/// Wire error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "INVALID_PARAM")]
    InvalidParameter,
    #[serde(rename = "MISSING_API_KEY")]
    MissingCredential,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "INVALID_PARAM",
            ErrorCode::MissingCredential => "MISSING_API_KEY",
        }
    }
}

/// Body of an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
}

/// Result envelope returned by the query tools.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEnvelope {
    Ok(ResponseValue),
    Error(ToolError),
}

impl ToolEnvelope {
    pub fn invalid_param(message: impl Into<String>) -> Self {
        ToolEnvelope::Error(ToolError {
            code: ErrorCode::InvalidParameter,
            message: message.into(),
        })
    }

    pub fn missing_credential(message: impl Into<String>) -> Self {
        ToolEnvelope::Error(ToolError {
            code: ErrorCode::MissingCredential,
            message: message.into(),
        })
    }

    /// Convert a validation error into its envelope.
    ///
    /// Returns the error back for anything that is not a validation error.
    pub fn from_validation(err: PediaError) -> Result<Self, PediaError> {
        match err {
            PediaError::InvalidParameter(msg) => Ok(Self::invalid_param(msg)),
            PediaError::MissingCredential(msg) => Ok(Self::missing_credential(msg)),
            other => Err(other),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ToolEnvelope::Ok(_))
    }

    pub fn data(&self) -> Option<&ResponseValue> {
        match self {
            ToolEnvelope::Ok(data) => Some(data),
            ToolEnvelope::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            ToolEnvelope::Error(e) => Some(e),
            ToolEnvelope::Ok(_) => None,
        }
    }
}

impl Serialize for ToolEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ToolEnvelope::Ok(data) => {
                let mut s = serializer.serialize_struct("ToolEnvelope", 2)?;
                s.serialize_field("ok", &true)?;
                s.serialize_field("data", data)?;
                s.end()
            }
            ToolEnvelope::Error(error) => {
                let mut s = serializer.serialize_struct("ToolEnvelope", 1)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}
