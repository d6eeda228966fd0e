//! Error types for the hospital chat client.
//!
//! The taxonomy follows how far an error is allowed to travel:
//!
//! | Error | Raised by | Escapes to the UI? |
//! |-------|-----------|--------------------|
//! | [`TransportError`] | HTTP layer, before or during a stream | Yes, terminal for the send |
//! | [`DecodeError`] | A single malformed SSE record | No, dropped and logged by the decoder |
//! | [`BusyError`] | A second send while a stream is active | Yes, synchronously, no state change |
//! | [`SendError`] | Session driver | Yes |
//!
//! In-band `error` events from the backend are not Rust errors at all: they
//! are ordinary [`StreamEvent`](crate::sse::StreamEvent)s that the conversation
//! state turns into a failed message.

mod conversation;
mod decode;
mod transport;

pub use conversation::{BusyError, SendError};
pub use decode::DecodeError;
pub use transport::TransportError;

/// Result alias used by the client and session layers.
pub type ChatResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_from_busy() {
        let err: SendError = BusyError.into();
        assert!(matches!(err, SendError::Busy(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_send_error_from_transport() {
        let err: SendError = TransportError::Timeout("30s".to_string()).into();
        assert!(matches!(err, SendError::Transport(_)));
        assert!(err.is_retryable());
    }
}
