//! Errors raised when driving a conversation.

use thiserror::Error;

use super::TransportError;

/// A stream is already active; the new send was rejected without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("A response is still streaming")]
pub struct BusyError;

/// Why a send did not start or did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Message is empty")]
    Empty,

    #[error(transparent)]
    Busy(#[from] BusyError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SendError::Transport(err) => err.is_retryable(),
            SendError::Empty | SendError::Busy(_) => false,
        }
    }
}
