//! Conversation driver.
//!
//! A [`ChatSession`] runs one send at a time end to end: it appends the user
//! message, opens the backend stream, applies every decoded event to the
//! conversation snapshot and freezes the answer when the stream is over.
//! Each intermediate snapshot is published as a [`ChatUpdate`] so a front end
//! can render partial output as it arrives.

use futures::StreamExt;
use std::future::Future;
use tokio::sync::{mpsc, oneshot};

use crate::client::ChatClient;
use crate::error::{BusyError, SendError, TransportError};
use crate::models::{ChatRequest, MessageId};
use crate::sse::{DecodeStats, StreamEvent};
use crate::state::ConversationState;
use crate::traits::HttpClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A transient notification (toast) for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, title, description)
    }
}

/// Published by a session after every state transition.
#[derive(Debug, Clone)]
pub enum ChatUpdate {
    Snapshot(ConversationState),
    Notice(Notice),
}

/// How a send ended, when it did not fail at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// `end` event received
    Completed,
    /// In-band `error` event received
    Errored,
    /// Body closed without a terminal event
    Truncated,
    /// Cancelled by the caller
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendSummary {
    /// The assistant message this send produced
    pub message_id: MessageId,
    pub outcome: SendOutcome,
    pub stats: DecodeStats,
}

/// Drives a conversation against the backend.
pub struct ChatSession<H> {
    client: ChatClient<H>,
    state: ConversationState,
    updates: mpsc::UnboundedSender<ChatUpdate>,
}

impl<H: HttpClient> ChatSession<H> {
    pub fn new(client: ChatClient<H>, updates: mpsc::UnboundedSender<ChatUpdate>) -> Self {
        let state = ConversationState::new(client.config().locale);
        Self {
            client,
            state,
            updates,
        }
    }

    /// Start from an existing snapshot, e.g. to continue a known conversation.
    pub fn with_state(mut self, state: ConversationState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn client(&self) -> &ChatClient<H> {
        &self.client
    }

    /// Send `text` over the streaming endpoint and consume the whole answer.
    pub async fn send(&mut self, text: &str) -> Result<SendSummary, SendError> {
        self.drive(text, futures::future::pending()).await
    }

    /// Like [`send`](Self::send), but stops as soon as `cancel` fires.
    ///
    /// Dropping the sender without sending does not cancel.
    pub async fn send_with_cancel(
        &mut self,
        text: &str,
        cancel: oneshot::Receiver<()>,
    ) -> Result<SendSummary, SendError> {
        let cancelled = async move {
            if cancel.await.is_err() {
                futures::future::pending::<()>().await;
            }
        };
        self.drive(text, cancelled).await
    }

    /// Send `text` over the buffered `/chat` endpoint.
    pub async fn send_without_streaming(&mut self, text: &str) -> Result<SendSummary, SendError> {
        let (message, message_id) = self.begin(text)?;
        let mut guard = InFlight { session: self };
        let session = &mut *guard.session;
        let request = ChatRequest::new(message, session.conversation_id());

        match session.client.send_message(&request).await {
            Ok(reply) => {
                tracing::info!(
                    conversation_id = %reply.conversation_id,
                    is_faq = reply.is_faq,
                    "Received chat reply"
                );
                let next = session.state.complete_with_reply(&reply);
                session.publish_state(next);
                Ok(SendSummary {
                    message_id,
                    outcome: SendOutcome::Completed,
                    stats: DecodeStats::default(),
                })
            }
            Err(err) => Err(session.fail_transport(err)),
        }
    }

    /// Forget the current conversation, locally and on the backend.
    ///
    /// The backend call is best effort: a failure is logged and the local
    /// snapshot is reset regardless.
    pub async fn new_conversation(&mut self) -> Result<(), BusyError> {
        let next = self.state.cleared()?;

        if let Some(id) = self.conversation_id() {
            if let Err(err) = self.client.clear_conversation(&id).await {
                tracing::warn!(conversation_id = %id, error = %err, "Failed to clear conversation");
            }
        }

        self.publish_state(next);
        Ok(())
    }

    fn conversation_id(&self) -> Option<String> {
        self.state.conversation_id().map(str::to_string)
    }

    /// Validate `text`, append the user message and the pending answer.
    fn begin(&mut self, text: &str) -> Result<(String, MessageId), SendError> {
        let message = text.trim();
        if message.is_empty() {
            return Err(SendError::Empty);
        }

        let (next, message_id) = self
            .state
            .start_user_message(message)?
            .begin_assistant_stream()?;
        self.publish_state(next);
        Ok((message.to_string(), message_id))
    }

    async fn drive(
        &mut self,
        text: &str,
        cancel: impl Future<Output = ()>,
    ) -> Result<SendSummary, SendError> {
        let (message, message_id) = self.begin(text)?;
        let mut guard = InFlight { session: self };
        let session = &mut *guard.session;
        let request = ChatRequest::streaming(message, session.conversation_id());
        tokio::pin!(cancel);

        let opened = tokio::select! {
            biased;
            _ = &mut cancel => None,
            result = session.client.stream_chat(&request) => Some(result),
        };
        let mut events = match opened {
            Some(Ok(events)) => events,
            Some(Err(err)) => return Err(session.fail_transport(err)),
            None => {
                session.finish_open_stream(SendOutcome::Cancelled);
                return Ok(SendSummary {
                    message_id,
                    outcome: SendOutcome::Cancelled,
                    stats: DecodeStats::default(),
                });
            }
        };

        let outcome = loop {
            tokio::select! {
                biased;
                _ = &mut cancel => break SendOutcome::Cancelled,
                item = events.next() => match item {
                    Some(Ok(event)) => {
                        if let Some(outcome) = session.apply(&event) {
                            break outcome;
                        }
                    }
                    Some(Err(err)) => {
                        drop(events);
                        return Err(session.fail_transport(err));
                    }
                    None => break SendOutcome::Truncated,
                },
            }
        };

        let stats = events.stats();
        // Release the body before touching state again
        drop(events);

        if stats.dropped > 0 {
            tracing::warn!(dropped = stats.dropped, "Dropped malformed stream records");
        }
        session.finish_open_stream(outcome);

        Ok(SendSummary {
            message_id,
            outcome,
            stats,
        })
    }

    /// Apply one event; returns the outcome once the event was terminal.
    fn apply(&mut self, event: &StreamEvent) -> Option<SendOutcome> {
        tracing::debug!(event_type = event.event_type_name(), "Applying stream event");
        let next = self.state.apply_event(event);
        self.publish_state(next);

        match event {
            StreamEvent::End {
                conversation_id, ..
            } => {
                tracing::info!(
                    conversation_id = conversation_id.as_deref().unwrap_or("-"),
                    "Chat stream completed"
                );
                Some(SendOutcome::Completed)
            }
            StreamEvent::Error { content } => {
                let locale = self.state.locale();
                let detail = content
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| locale.generic_error_detail());
                tracing::warn!(detail, "Backend reported an error");
                self.publish_notice(Notice::error(locale.send_error_title(), detail));
                Some(SendOutcome::Errored)
            }
            StreamEvent::Status { .. } | StreamEvent::Token { .. } => None,
        }
    }

    /// Freeze the answer if the stream stopped without a terminal event.
    fn finish_open_stream(&mut self, outcome: SendOutcome) {
        if !self.state.is_busy() {
            return;
        }
        let next = self.state.finalize_on_stream_close();
        self.publish_state(next);

        let locale = self.state.locale();
        let notice = match outcome {
            SendOutcome::Cancelled => {
                tracing::info!("Chat stream cancelled");
                Notice::new(
                    Severity::Info,
                    locale.stopped_title(),
                    locale.stopped_detail(),
                )
            }
            _ => {
                tracing::warn!("Chat stream closed without a terminal event");
                Notice::new(
                    Severity::Warning,
                    locale.incomplete_title(),
                    locale.incomplete_detail(),
                )
            }
        };
        self.publish_notice(notice);
    }

    fn fail_transport(&mut self, err: TransportError) -> SendError {
        let next = self.state.handle_transport_failure(&err);
        self.publish_state(next);

        let locale = self.state.locale();
        self.publish_notice(Notice::error(
            locale.send_error_title(),
            locale.send_failed_detail(),
        ));
        SendError::Transport(err)
    }

    fn publish_state(&mut self, next: ConversationState) {
        self.state = next;
        // The front end may have gone away; the session keeps working without it
        let _ = self.updates.send(ChatUpdate::Snapshot(self.state.clone()));
    }

    fn publish_notice(&self, notice: Notice) {
        let _ = self.updates.send(ChatUpdate::Notice(notice));
    }
}

/// Exclusive hold on a session while a send is in flight.
///
/// A send future dropped before it finishes (a timeout, a losing `select!`
/// branch, an aborted task) leaves the answer streaming. Dropping the guard
/// freezes it the same way an explicit cancel does.
struct InFlight<'a, H: HttpClient> {
    session: &'a mut ChatSession<H>,
}

impl<H: HttpClient> Drop for InFlight<'_, H> {
    fn drop(&mut self) {
        // No-op once the send reached a terminal state
        self.session.finish_open_stream(SendOutcome::Cancelled);
    }
}
