//! Response interpretation: transport outcome → decoded document.
//!
//! # Design
//! `interpret` is the only place that looks at status codes and raw bodies. It
//! classifies failures as transport or decode errors and otherwise yields a
//! `Decoded` value. Operations then project that value with the `require_*`
//! helpers, which turn a missing or mistyped field into `ApiError::Protocol`
//! (or `ApiError::Rejected` when the service explained itself with an
//! `error` message).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::call::Output;
use crate::error::{ApiError, TransportError};
use crate::http::HttpResponse;

/// A successfully decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    Text(String),
}

impl Decoded {
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            Decoded::Json(value) => Ok(value),
            Decoded::Text(_) => Err(ApiError::Protocol(
                "expected a JSON document, got plain text".to_string(),
            )),
        }
    }

    pub fn into_text(self) -> Result<String, ApiError> {
        match self {
            Decoded::Text(text) => Ok(text),
            Decoded::Json(_) => Err(ApiError::Protocol(
                "expected plain text, got a JSON document".to_string(),
            )),
        }
    }
}

/// Classify a transport outcome and decode its body.
pub fn interpret(
    outcome: Result<HttpResponse, TransportError>,
    output: Output,
) -> Result<Decoded, ApiError> {
    let response = outcome?;
    if !response.is_success() {
        return Err(TransportError::Status {
            status: response.status,
            body: response.body,
        }
        .into());
    }
    match output {
        Output::Json => serde_json::from_str(&response.body)
            .map(Decoded::Json)
            .map_err(|e| ApiError::Decode(e.to_string())),
        Output::Text => Ok(Decoded::Text(response.body)),
    }
}

/// Error for a missing required field. Prefers the service's own error
/// message when the document carries one.
fn missing(doc: &Value, field: &str) -> ApiError {
    match doc.get("error").and_then(Value::as_str) {
        Some(message) => ApiError::Rejected(message.to_string()),
        None => ApiError::Protocol(format!("missing field `{field}`")),
    }
}

fn mistyped(field: &str, expected: &str) -> ApiError {
    ApiError::Protocol(format!("field `{field}` is not {expected}"))
}

/// The value of a required top-level field.
pub fn require<'a>(doc: &'a Value, field: &str) -> Result<&'a Value, ApiError> {
    match doc.get(field) {
        Some(Value::Null) | None => Err(missing(doc, field)),
        Some(value) => Ok(value),
    }
}

pub fn require_str<'a>(doc: &'a Value, field: &str) -> Result<&'a str, ApiError> {
    require(doc, field)?
        .as_str()
        .ok_or_else(|| mistyped(field, "a string"))
}

pub fn require_array<'a>(doc: &'a Value, field: &str) -> Result<&'a Vec<Value>, ApiError> {
    require(doc, field)?
        .as_array()
        .ok_or_else(|| mistyped(field, "an array"))
}

pub fn require_object<'a>(doc: &'a Value, field: &str) -> Result<&'a Map<String, Value>, ApiError> {
    require(doc, field)?
        .as_object()
        .ok_or_else(|| mistyped(field, "an object"))
}

/// A non-negative integer field. Numeric strings are accepted because the
/// service reports some counters as strings.
pub fn require_u64(doc: &Value, field: &str) -> Result<u64, ApiError> {
    let value = require(doc, field)?;
    as_u64(value).ok_or_else(|| mistyped(field, "a non-negative integer"))
}

pub fn require_i64(doc: &Value, field: &str) -> Result<i64, ApiError> {
    let value = require(doc, field)?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| mistyped(field, "an integer"))
}

pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// The `status` flag of an action call.
///
/// `status: false` with an `error` message is a rejection; a bare
/// `status: false` is returned as `Ok(false)`.
pub fn require_status(doc: &Value) -> Result<bool, ApiError> {
    let status = require(doc, "status")?
        .as_bool()
        .ok_or_else(|| mistyped("status", "a boolean"))?;
    if !status {
        if let Some(message) = doc.get("error").and_then(Value::as_str) {
            return Err(ApiError::Rejected(message.to_string()));
        }
    }
    Ok(status)
}

/// Deserialize a required field into a typed record.
pub fn decode_field<T: DeserializeOwned>(doc: &Value, field: &str) -> Result<T, ApiError> {
    let value = require(doc, field)?;
    T::deserialize(value).map_err(|e| ApiError::Protocol(format!("field `{field}`: {e}")))
}

/// A required array of strings.
pub fn require_strings(doc: &Value, field: &str) -> Result<Vec<String>, ApiError> {
    require_array(doc, field)?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| mistyped(field, "an array of strings"))
        })
        .collect()
}
