//! Decoder error types.

use thiserror::Error;

/// Errors that can occur while decoding a raw gateway line.
///
/// Parsing inside a well-formed payload never fails; these errors only
/// cover text that is not a gateway payload at all, and unknown events when
/// the decoder is strict.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The text is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON value is not an object.
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// Strict decoding met an event tag it does not model.
    #[error("Unknown event type: {0}")]
    UnknownEvent(String),
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
