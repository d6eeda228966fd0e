//! Per-record decode failures.

use thiserror::Error;

/// A single SSE record could not be turned into a stream event.
///
/// Never escapes the decoder: the record is dropped, logged and counted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Record is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),

    #[error("Record exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::InvalidPayload(err.to_string())
    }
}
