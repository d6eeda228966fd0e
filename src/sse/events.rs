//! Event type definitions for the chat stream.

use serde::{Deserialize, Deserializer, Serialize};

/// A classified line of an SSE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload of a `data:` line
    Data(&'a str),
    /// Empty line (record separator)
    Empty,
    /// Comment line (starts with ':')
    Comment(&'a str),
    /// Any other field (`event:`, `id:`, `retry:`) or unknown text
    Other(&'a str),
}

/// Typed events emitted by the chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Transient progress line; replaces whatever progress was shown before
    Status {
        #[serde(default, deserialize_with = "null_as_default")]
        content: String,
    },
    /// Incremental answer text; appended
    Token {
        #[serde(default, deserialize_with = "null_as_default")]
        content: String,
    },
    /// Stream completed successfully
    End {
        #[serde(default)]
        conversation_id: Option<String>,
        #[serde(default)]
        sources: Option<Vec<String>>,
        #[serde(default, deserialize_with = "null_as_default")]
        is_faq: bool,
    },
    /// Backend reported a failure in-band
    Error {
        #[serde(default)]
        content: Option<String>,
    },
}

impl StreamEvent {
    pub fn status(content: impl Into<String>) -> Self {
        StreamEvent::Status {
            content: content.into(),
        }
    }

    pub fn token(content: impl Into<String>) -> Self {
        StreamEvent::Token {
            content: content.into(),
        }
    }

    /// `end` event with a conversation id and no sources.
    pub fn end(conversation_id: impl Into<String>) -> Self {
        StreamEvent::End {
            conversation_id: Some(conversation_id.into()),
            sources: None,
            is_faq: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        StreamEvent::Error {
            content: Some(content.into()),
        }
    }

    /// Returns the wire `type` tag.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Status { .. } => "status",
            StreamEvent::Token { .. } => "token",
            StreamEvent::End { .. } => "end",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Whether this event ends the assistant turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::End { .. } | StreamEvent::Error { .. })
    }

    /// Encode as a complete SSE record (`data: ...` plus blank separator).
    pub fn to_sse_frame(&self) -> String {
        // Serializing a plain enum of strings cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("data: {}\n\n", json)
    }
}

/// The backend writes `null` for absent optional fields (e.g. `"sources": null`).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
