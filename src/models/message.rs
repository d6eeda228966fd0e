use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client-generated message identifier, stable for the message's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// Lifecycle of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// The active streaming message; the only mutable state
    Streaming,
    /// Finished normally
    Complete,
    /// Stream closed or was cancelled before a terminal event
    Truncated,
    /// Backend error event or transport failure
    Failed,
}

impl MessageStatus {
    pub fn is_frozen(self) -> bool {
        self != MessageStatus::Streaming
    }
}

/// A single entry in the conversation.
///
/// Assistant text is kept in two parts: the `answer` accumulated from token
/// events, and a transient `progress` line from status events. Only
/// [`ConversationState`](crate::state::ConversationState) mutates messages,
/// and only while they are [`MessageStatus::Streaming`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    id: MessageId,
    author: Author,
    answer: String,
    #[serde(default)]
    progress: Option<String>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    sources: Option<Vec<String>>,
    #[serde(default)]
    is_faq: bool,
    status: MessageStatus,
}

impl ConversationMessage {
    pub(crate) fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            author: Author::User,
            answer: text.into(),
            progress: None,
            timestamp: Utc::now(),
            sources: None,
            is_faq: false,
            status: MessageStatus::Complete,
        }
    }

    /// Empty assistant message, shown as "thinking" until the first event.
    pub(crate) fn pending_assistant() -> Self {
        Self {
            id: MessageId::new(),
            author: Author::Assistant,
            answer: String::new(),
            progress: None,
            timestamp: Utc::now(),
            sources: None,
            is_faq: false,
            status: MessageStatus::Streaming,
        }
    }

    /// Standalone, already frozen, assistant error message.
    pub(crate) fn failed_assistant(text: impl Into<String>) -> Self {
        let mut message = Self::pending_assistant();
        message.fail(text);
        message
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    /// Text to display: the progress line while one is showing, else the answer.
    pub fn text(&self) -> &str {
        self.progress.as_deref().unwrap_or(&self.answer)
    }

    /// Answer text accumulated from tokens, ignoring any progress line.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn sources(&self) -> Option<&[String]> {
        self.sources.as_deref()
    }

    pub fn is_faq(&self) -> bool {
        self.is_faq
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }

    /// Active message with nothing to show yet.
    pub fn is_thinking(&self) -> bool {
        self.is_streaming() && self.text().is_empty()
    }

    pub(crate) fn set_progress(&mut self, line: impl Into<String>) {
        self.progress = Some(line.into());
    }

    pub(crate) fn append_token(&mut self, token: &str) {
        self.progress = None;
        self.answer.push_str(token);
    }

    /// Freeze after an `end` event.
    pub(crate) fn complete(&mut self, sources: Option<Vec<String>>, is_faq: bool) {
        self.progress = None;
        self.sources = sources;
        self.is_faq = is_faq;
        self.status = MessageStatus::Complete;
    }

    /// Freeze with a replacement text (non-streaming reply).
    pub(crate) fn complete_with(
        &mut self,
        text: impl Into<String>,
        sources: Option<Vec<String>>,
        is_faq: bool,
    ) {
        self.answer = text.into();
        self.complete(sources, is_faq);
    }

    pub(crate) fn fail(&mut self, text: impl Into<String>) {
        self.answer = text.into();
        self.progress = None;
        self.status = MessageStatus::Failed;
    }

    /// Freeze as-is after the stream ended without a terminal event.
    pub(crate) fn truncate(&mut self) {
        self.status = MessageStatus::Truncated;
    }
}
