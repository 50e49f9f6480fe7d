//! Error types for request handling

use thiserror::Error;

/// Failures surfaced to the remote caller as an `error` response
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// Request payload is not a well-formed request
    #[error("Failed to decode request: {0}")]
    Decode(String),
    /// Well-formed payload naming a request this engine does not know
    #[error("Unsupported request type: {0}")]
    UnsupportedRequest(String),
    /// Explicit index outside the configured range
    #[error("Invalid {what} {index} (valid range 0..{limit})")]
    InvalidPosition {
        what: &'static str,
        index: usize,
        limit: usize,
    },
    /// Response could not be serialized
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}
