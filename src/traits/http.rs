//! HTTP client trait abstraction.
//!
//! The chat client only needs four verbs plus a streaming POST, so the trait
//! stays small enough for a hand-written mock.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

use crate::error::TransportError;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Body of a streaming response, delivered in arbitrarily sized chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8, for error messages.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }

    /// Turn a non-2xx response into [`TransportError::Status`].
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                message: self.text_lossy(),
            })
        }
    }
}

/// HTTP operations needed to talk to the chat backend.
///
/// Implementations: [`ReqwestHttpClient`](crate::adapters::ReqwestHttpClient)
/// for production and [`MockHttpClient`](crate::adapters::MockHttpClient) for tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, TransportError>;

    async fn post(&self, url: &str, body: &str, headers: &Headers)
        -> Result<Response, TransportError>;

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, TransportError>;

    /// POST and hand back the body as a chunk stream.
    ///
    /// Non-2xx responses must be reported as [`TransportError::Status`]
    /// instead of a stream. Dropping the returned stream releases the
    /// underlying connection.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        assert!(Response::new(200, Bytes::new()).is_success());
        assert!(Response::new(204, Bytes::new()).is_success());
        assert!(!Response::new(300, Bytes::new()).is_success());
        assert!(!Response::new(404, Bytes::new()).is_success());
        assert!(!Response::new(500, Bytes::new()).is_success());
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Health {
            status: String,
        }

        let response = Response::new(200, Bytes::from(r#"{"status":"healthy"}"#));
        let health: Health = response.json().unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_response_json_invalid() {
        let response = Response::new(200, Bytes::from("<html>"));
        let result: Result<serde_json::Value, _> = response.json();
        assert!(matches!(result, Err(TransportError::InvalidResponse(_))));
    }

    #[test]
    fn test_error_for_status() {
        let ok = Response::new(200, Bytes::from("fine"));
        assert!(ok.error_for_status().is_ok());

        let missing = Response::new(404, Bytes::from(r#"{"detail":"Conversation not found"}"#));
        match missing.error_for_status() {
            Err(TransportError::Status { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("Conversation not found"));
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }
}
