//! Wire envelope shared by every PropStage backend response.

use serde::Deserialize;
use serde_json::Value;

use crate::{normalize::normalize_error_message, PropStageError, Result};

/// Uniform backend response wrapper: exactly one of `data`/`error` is
/// meaningful, selected by `success`.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Parses a 2xx body and resolves the envelope.
///
/// `success = true` yields the payload; `success = false` yields an
/// [`PropStageError::Application`] carrying the normalized error message.
/// Callers decide how to present the failure; nothing is rendered here.
pub fn unwrap_envelope(body: &str) -> Result<Value> {
    let envelope: ResponseEnvelope = serde_json::from_str(body)
        .map_err(|err| PropStageError::Decode(format!("invalid response envelope: {err}")))?;
    if envelope.success {
        return Ok(envelope.data.unwrap_or(Value::Null));
    }
    let (raw_message, code) = match envelope.error {
        Some(error) => (error.message, error.code),
        None => (String::new(), None),
    };
    Err(PropStageError::Application {
        message: normalize_error_message(&raw_message),
        code,
    })
}

/// Extracts the backend's raw error message from a non-2xx body, when the
/// body still carries an envelope (or a bare `{"message": ...}` object).
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    if let Some(message) = value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_owned());
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
