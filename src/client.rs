//! Chat backend API client.
//!
//! Typed wrappers around the backend endpoints. The streaming endpoint
//! returns a [`StreamDecoder`] over the response body; everything else is
//! a buffered JSON call.

use serde::Deserialize;

use crate::adapters::ReqwestHttpClient;
use crate::config::ChatConfig;
use crate::error::{ChatResult, TransportError};
use crate::models::{ChatRequest, ChatResponse, ConversationHistory, HospitalInfo};
use crate::sse::StreamDecoder;
use crate::traits::{ByteStream, Headers, HttpClient};

/// Event stream returned by [`ChatClient::stream_chat`].
pub type ChatEventStream = StreamDecoder<ByteStream>;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the chat backend, generic over the HTTP transport.
#[derive(Debug, Clone)]
pub struct ChatClient<H> {
    http: H,
    config: ChatConfig,
}

impl ChatClient<ReqwestHttpClient> {
    /// Production client over reqwest, honouring the configured connect timeout.
    pub fn from_config(config: ChatConfig) -> ChatResult<Self> {
        let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)?;
        Ok(Self::new(http, config))
    }
}

impl<H: HttpClient> ChatClient<H> {
    pub fn new(http: H, config: ChatConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    fn encode(request: &ChatRequest) -> ChatResult<String> {
        serde_json::to_string(request).map_err(|e| TransportError::Other(e.to_string()))
    }

    fn conversation_url(&self, conversation_id: &str) -> String {
        self.config.endpoint(&format!(
            "/conversation/{}",
            urlencoding::encode(conversation_id)
        ))
    }

    /// `POST /chat/stream`: open a streaming answer.
    ///
    /// A non-2xx status fails here, before any event is produced.
    pub async fn stream_chat(&self, request: &ChatRequest) -> ChatResult<ChatEventStream> {
        let url = self.config.endpoint("/chat/stream");
        let body = Self::encode(request)?;

        let mut headers = Self::json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!(
            conversation_id = request.conversation_id.as_deref().unwrap_or("-"),
            "Opening chat stream"
        );
        let body_stream = self.http.post_stream(&url, &body, &headers).await?;

        Ok(StreamDecoder::new(body_stream).with_max_line_bytes(self.config.max_line_bytes))
    }

    /// `POST /chat`: non-streaming answer.
    pub async fn send_message(&self, request: &ChatRequest) -> ChatResult<ChatResponse> {
        let url = self.config.endpoint("/chat");
        let body = Self::encode(request)?;

        let response = self.http.post(&url, &body, &Self::json_headers()).await?;
        response.error_for_status()?.json()
    }

    /// `GET /hospital-info`: display metadata and FAQ suggestions.
    pub async fn hospital_info(&self) -> ChatResult<HospitalInfo> {
        let url = self.config.endpoint("/hospital-info");
        let response = self.http.get(&url, &Headers::new()).await?;
        response.error_for_status()?.json()
    }

    /// `GET /health`: whether the backend reports itself healthy.
    pub async fn health(&self) -> ChatResult<bool> {
        let url = self.config.endpoint("/health");
        let response = self.http.get(&url, &Headers::new()).await?;
        if !response.is_success() {
            return Ok(false);
        }
        let health: HealthResponse = response.json()?;
        Ok(health.status == "healthy")
    }

    /// `GET /conversation/{id}`: server-side history.
    pub async fn conversation(&self, conversation_id: &str) -> ChatResult<ConversationHistory> {
        let url = self.conversation_url(conversation_id);
        let response = self.http.get(&url, &Headers::new()).await?;
        response.error_for_status()?.json()
    }

    /// `DELETE /conversation/{id}`: forget server-side history.
    pub async fn clear_conversation(&self, conversation_id: &str) -> ChatResult<()> {
        let url = self.conversation_url(conversation_id);
        let response = self.http.delete(&url, &Headers::new()).await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::sse::StreamEvent;
    use crate::traits::Response;
    use bytes::Bytes;
    use futures::StreamExt;

    const BASE: &str = "http://backend.test";

    fn client(mock: &MockHttpClient) -> ChatClient<MockHttpClient> {
        ChatClient::new(mock.clone(), ChatConfig::new().with_base_url(BASE))
    }

    #[tokio::test]
    async fn test_stream_chat_sends_request_and_decodes() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://backend.test/chat/stream",
            MockResponse::Stream(vec![
                Bytes::from("data: {\"type\":\"token\",\"con"),
                Bytes::from("tent\":\"Hi\"}\n\n"),
                Bytes::from(StreamEvent::end("c1").to_sse_frame()),
            ]),
        );

        let request = ChatRequest::streaming("Hello", None);
        let events: Vec<_> = client(&mock)
            .stream_chat(&request)
            .await
            .unwrap()
            .map(|e| e.unwrap())
            .collect()
            .await;

        assert_eq!(events, vec![StreamEvent::token("Hi"), StreamEvent::end("c1")]);

        let recorded = mock.get_requests();
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(
            recorded[0].headers.get("Accept"),
            Some(&"text/event-stream".to_string())
        );
        let body: serde_json::Value =
            serde_json::from_str(recorded[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Hello", "stream": true}));
    }

    #[tokio::test]
    async fn test_stream_chat_error_status() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            500,
            Bytes::from("Internal Server Error"),
        )));

        let result = client(&mock)
            .stream_chat(&ChatRequest::streaming("Hello", None))
            .await;
        assert!(matches!(
            result,
            Err(TransportError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_send_message() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://backend.test/chat",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"response":"Hi","conversation_id":"conv_1","is_faq":false}"#),
            )),
        );

        let reply = client(&mock)
            .send_message(&ChatRequest::new("Hello", Some("conv_1".to_string())))
            .await
            .unwrap();
        assert_eq!(reply.response, "Hi");
        assert_eq!(reply.conversation_id, "conv_1");
    }

    #[tokio::test]
    async fn test_send_message_invalid_body() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(200, Bytes::from("ok"))));

        let result = client(&mock)
            .send_message(&ChatRequest::new("Hello", None))
            .await;
        assert!(matches!(result, Err(TransportError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_health() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://backend.test/health",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"status":"healthy","timestamp":1718000000.1}"#),
            )),
        );
        assert!(client(&mock).health().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_unhealthy_status() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(503, Bytes::new())));
        assert!(!client(&mock).health().await.unwrap());
    }

    #[tokio::test]
    async fn test_conversation_id_is_url_encoded() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"{"message":"Conversation cleared successfully"}"#),
        )));

        client(&mock).clear_conversation("conv 1/2").await.unwrap();

        let recorded = mock.get_requests();
        assert_eq!(recorded[0].method, "DELETE");
        assert_eq!(recorded[0].url, "http://backend.test/conversation/conv%201%2F2");
    }

    #[tokio::test]
    async fn test_conversation_not_found() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            404,
            Bytes::from(r#"{"detail":"Conversation not found"}"#),
        )));

        let result = client(&mock).conversation("missing").await;
        assert_eq!(result.unwrap_err().status(), Some(404));
    }
}
