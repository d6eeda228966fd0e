use serde::{Deserialize, Serialize};

/// Body of `POST /chat` and `POST /chat/stream`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    /// Conversation to continue; `None` starts a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatRequest {
    /// Request for the non-streaming endpoint.
    pub fn new(message: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id,
            stream: None,
        }
    }

    /// Request for the streaming endpoint.
    pub fn streaming(message: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id,
            stream: Some(true),
        }
    }
}

/// Reply from the non-streaming `POST /chat` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    #[serde(default)]
    pub is_faq: bool,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_request_serialization() {
        let request = ChatRequest::streaming("Hello", Some("c1".to_string()));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "Hello", "conversation_id": "c1", "stream": true})
        );
    }

    #[test]
    fn test_new_conversation_omits_id() {
        let request = ChatRequest::new("Hello", None);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"message":"Hello"}"#);
    }

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{"response":"Open 8-4","conversation_id":"conv_1","is_faq":true,"sources":null}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.response, "Open 8-4");
        assert!(response.is_faq);
        assert_eq!(response.sources, None);
    }
}
