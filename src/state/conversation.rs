use std::sync::Arc;

use crate::error::{BusyError, TransportError};
use crate::locale::Locale;
use crate::models::{ChatResponse, ConversationMessage, MessageId};
use crate::sse::StreamEvent;

/// Ordered messages, the backend conversation id and the active stream pointer.
///
/// At most one assistant message is active at a time; while one is, sends
/// are rejected with [`BusyError`]. Stream events always target the active
/// message, never a message by id, so a frozen message cannot be mutated
/// by a late or misrouted event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    messages: Vec<Arc<ConversationMessage>>,
    conversation_id: Option<String>,
    active: Option<MessageId>,
    locale: Locale,
}

impl ConversationState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Continue an existing backend conversation.
    pub fn resume(locale: Locale, conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(conversation_id.into()),
            ..Self::new(locale)
        }
    }

    // ---- queries ----

    pub fn messages(&self) -> impl ExactSizeIterator<Item = &ConversationMessage> + '_ {
        self.messages.iter().map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message(&self, id: MessageId) -> Option<&ConversationMessage> {
        self.messages.iter().map(|m| m.as_ref()).find(|m| m.id() == id)
    }

    pub fn last_message(&self) -> Option<&ConversationMessage> {
        self.messages.last().map(|m| m.as_ref())
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn active_message_id(&self) -> Option<MessageId> {
        self.active
    }

    pub fn active_message(&self) -> Option<&ConversationMessage> {
        self.active_index().map(|i| self.messages[i].as_ref())
    }

    /// A stream is active; new sends must be rejected.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    // ---- transitions ----

    /// Append an immutable user message.
    pub fn start_user_message(&self, text: impl Into<String>) -> Result<Self, BusyError> {
        self.ensure_idle()?;
        let mut next = self.clone();
        next.messages.push(Arc::new(ConversationMessage::user(text)));
        Ok(next)
    }

    /// Append an empty assistant message and make it the active one.
    pub fn begin_assistant_stream(&self) -> Result<(Self, MessageId), BusyError> {
        self.ensure_idle()?;
        let message = ConversationMessage::pending_assistant();
        let id = message.id();

        let mut next = self.clone();
        next.messages.push(Arc::new(message));
        next.active = Some(id);
        Ok((next, id))
    }

    /// Apply one decoded stream event to the active message.
    ///
    /// Without an active message the event is ignored.
    pub fn apply_event(&self, event: &StreamEvent) -> Self {
        if self.active.is_none() {
            tracing::debug!(
                event_type = event.event_type_name(),
                "Ignoring stream event with no active message"
            );
            return self.clone();
        }

        match event {
            StreamEvent::Status { content } => self.update_active(|m| m.set_progress(content.as_str())),
            StreamEvent::Token { content } => self.update_active(|m| m.append_token(content)),
            StreamEvent::End {
                conversation_id,
                sources,
                is_faq,
            } => {
                let mut next = self.update_active(|m| m.complete(sources.clone(), *is_faq));
                if let Some(id) = conversation_id.as_deref().filter(|id| !id.is_empty()) {
                    next.conversation_id = Some(id.to_string());
                }
                next.active = None;
                next
            }
            StreamEvent::Error { content } => {
                let text = self.locale.stream_error(content.as_deref());
                let mut next = self.update_active(|m| m.fail(text));
                next.active = None;
                next
            }
        }
    }

    /// The event stream ended without `end` or `error`: freeze the active
    /// message as it is.
    pub fn finalize_on_stream_close(&self) -> Self {
        if self.active.is_none() {
            return self.clone();
        }
        let mut next = self.update_active(|m| m.truncate());
        next.active = None;
        next
    }

    /// The transport failed: freeze the active message with an error text,
    /// or append a standalone error message if nothing was active.
    pub fn handle_transport_failure(&self, error: &TransportError) -> Self {
        tracing::error!(error = %error, "Chat transport failed");
        let text = self.locale.send_failed();

        let mut next = if self.active_index().is_some() {
            self.update_active(|m| m.fail(text))
        } else {
            let mut next = self.clone();
            next.messages
                .push(Arc::new(ConversationMessage::failed_assistant(text)));
            next
        };
        next.active = None;
        next
    }

    /// Fill and freeze the active message from a non-streaming reply.
    pub fn complete_with_reply(&self, reply: &ChatResponse) -> Self {
        if self.active.is_none() {
            return self.clone();
        }
        let mut next = self.update_active(|m| {
            m.complete_with(reply.response.as_str(), reply.sources.clone(), reply.is_faq)
        });
        if !reply.conversation_id.is_empty() {
            next.conversation_id = Some(reply.conversation_id.clone());
        }
        next.active = None;
        next
    }

    /// Empty conversation with the same locale.
    pub fn cleared(&self) -> Result<Self, BusyError> {
        self.ensure_idle()?;
        Ok(Self::new(self.locale))
    }

    fn ensure_idle(&self) -> Result<(), BusyError> {
        if self.is_busy() {
            Err(BusyError)
        } else {
            Ok(())
        }
    }

    fn active_index(&self) -> Option<usize> {
        let active = self.active?;
        // The active message is normally the last one
        self.messages.iter().rposition(|m| m.id() == active)
    }

    fn update_active(&self, f: impl FnOnce(&mut ConversationMessage)) -> Self {
        let mut next = self.clone();
        if let Some(index) = next.active_index() {
            f(Arc::make_mut(&mut next.messages[index]));
        }
        next
    }
}
