//! Transport-level failures (network and HTTP).

use thiserror::Error;

/// Failure of the HTTP transport before or during a request.
///
/// Terminal for the current send attempt. Prior conversation state is never
/// discarded because of one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The response body broke off mid-stream.
    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed(_)
            | TransportError::Timeout(_)
            | TransportError::Io(_) => true,
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::InvalidUrl(_)
            | TransportError::InvalidResponse(_)
            | TransportError::Other(_) => false,
        }
    }

    /// Short operator-facing explanation, shown in notices and the CLI.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::ConnectionFailed(_) => {
                "Unable to reach the chat service. Please check that it is running.".to_string()
            }
            TransportError::Timeout(_) => {
                "The chat service did not respond in time. Please try again.".to_string()
            }
            TransportError::Status { status: 429, .. } => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            TransportError::Status { status, .. } if *status >= 500 => {
                format!("The chat service failed ({}). Please try again later.", status)
            }
            TransportError::Status { status, .. } => {
                format!("The chat service rejected the request ({}).", status)
            }
            TransportError::Io(_) => "The connection was interrupted mid-answer.".to_string(),
            TransportError::InvalidUrl(url) => format!("Invalid chat service URL: {}", url),
            TransportError::InvalidResponse(_) => {
                "The chat service sent an unexpected response.".to_string()
            }
            TransportError::Other(msg) => msg.clone(),
        }
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a reqwest error.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Io(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        assert_eq!(
            TransportError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            TransportError::Status {
                status: 502,
                message: "Bad Gateway".to_string()
            }
            .to_string(),
            "Server error (502): Bad Gateway"
        );
    }

    #[test]
    fn test_transport_error_retryable() {
        assert!(TransportError::Timeout("t".to_string()).is_retryable());
        assert!(TransportError::Io("reset".to_string()).is_retryable());
        assert!(TransportError::Status {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(TransportError::Status {
            status: 429,
            message: String::new()
        }
        .is_retryable());
        assert!(!TransportError::Status {
            status: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!TransportError::InvalidResponse("x".to_string()).is_retryable());
    }

    #[test]
    fn test_transport_error_status() {
        let err = TransportError::Status {
            status: 404,
            message: "Conversation not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(TransportError::Io("reset".to_string()).status(), None);
    }

    #[test]
    fn test_transport_error_user_message() {
        let throttled = TransportError::Status {
            status: 429,
            message: String::new(),
        };
        assert!(throttled.user_message().contains("Too many requests"));

        let server = TransportError::Status {
            status: 502,
            message: String::new(),
        };
        assert!(server.user_message().contains("502"));
        assert_eq!(
            TransportError::Other("boom".to_string()).user_message(),
            "boom"
        );
    }
}
