//! Mock implementations for test fixtures.
//!
//! Re-exports the mock adapter from `hospital_chat::adapters::mock` and adds
//! a small builder for scripting backend responses.

pub use hospital_chat::adapters::mock::{MockHttpClient, MockResponse, RecordedRequest};
pub use hospital_chat::traits::{Headers, HttpClient, Response};

use bytes::Bytes;
use hospital_chat::{StreamEvent, TransportError};

use super::sse_body;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a buffered JSON response.
    pub fn with_json_response(self, url: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Configures an SSE body carrying `events`, one chunk per frame.
    pub fn with_stream(self, url: &str, events: &[StreamEvent]) -> Self {
        let chunks = events
            .iter()
            .map(|e| Bytes::from(e.to_sse_frame()))
            .collect();
        self.client.set_response(url, MockResponse::Stream(chunks));
        self
    }

    /// Configures an SSE body delivered in the given raw chunks.
    pub fn with_chunks(self, url: &str, chunks: Vec<Bytes>) -> Self {
        self.client.set_response(url, MockResponse::Stream(chunks));
        self
    }

    /// Configures an SSE body that breaks off after `events`.
    pub fn with_broken_stream(
        self,
        url: &str,
        events: &[StreamEvent],
        error: TransportError,
    ) -> Self {
        let chunks = vec![Bytes::from(sse_body(events))];
        self.client
            .set_response(url, MockResponse::StreamThenError(chunks, error));
        self
    }

    /// Configures an SSE body that never completes after `events`.
    pub fn with_hanging_stream(self, url: &str, events: &[StreamEvent]) -> Self {
        let chunks = vec![Bytes::from(sse_body(events))];
        self.client
            .set_response(url, MockResponse::StreamThenHang(chunks));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
