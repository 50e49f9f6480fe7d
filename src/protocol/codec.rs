//! JSON encoding of protocol messages
//!
//! The transport hands over opaque byte payloads; this module turns them
//! into typed messages and back.

use super::{Request, Response};
use crate::error::DiagnosticsError;
use serde_json::Value;

/// Decode one request payload.
///
/// Payloads that are not a single-key JSON object fail with
/// [`DiagnosticsError::Decode`]; a single key naming no known request fails
/// with [`DiagnosticsError::UnsupportedRequest`].
pub fn decode_request(payload: &[u8]) -> Result<Request, DiagnosticsError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|e| DiagnosticsError::Decode(e.to_string()))?;

    let tag = match &value {
        Value::Object(map) if map.len() == 1 => map.keys().next().cloned(),
        _ => None,
    };
    let Some(tag) = tag else {
        return Err(DiagnosticsError::Decode(
            "expected an object with exactly one request field".to_string(),
        ));
    };
    if !Request::TAGS.contains(&tag.as_str()) {
        return Err(DiagnosticsError::UnsupportedRequest(tag));
    }

    serde_json::from_value(value).map_err(|e| DiagnosticsError::Decode(e.to_string()))
}

pub fn encode_request(request: &Request) -> Result<Vec<u8>, DiagnosticsError> {
    Ok(serde_json::to_vec(request)?)
}

pub fn decode_response(payload: &[u8]) -> Result<Response, DiagnosticsError> {
    serde_json::from_slice(payload).map_err(|e| DiagnosticsError::Decode(e.to_string()))
}

pub fn encode_response(response: &Response) -> Result<Vec<u8>, DiagnosticsError> {
    Ok(serde_json::to_vec(response)?)
}
