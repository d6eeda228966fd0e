//! Common test utilities for integration tests.
//!
//! ```ignore
//! mod common;
//! use common::*;
//!
//! let mock = MockHttpConfig::new()
//!     .with_stream(STREAM_URL, &[StreamEvent::token("Hi"), StreamEvent::end("c1")])
//!     .build();
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use bytes::Bytes;
use hospital_chat::{ChatClient, ChatConfig, ChatSession, ChatUpdate, Locale, StreamEvent};
use tokio::sync::mpsc;

/// Base URL used by every mock-backed test.
pub const BASE_URL: &str = "http://backend.test";
pub const STREAM_URL: &str = "http://backend.test/chat/stream";

/// English config pointing at [`BASE_URL`].
pub fn test_config() -> ChatConfig {
    ChatConfig::new()
        .with_base_url(BASE_URL)
        .with_locale(Locale::English)
}

/// A session over `mock` plus the receiving end of its updates.
pub fn test_session(
    mock: &MockHttpClient,
) -> (
    ChatSession<MockHttpClient>,
    mpsc::UnboundedReceiver<ChatUpdate>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let client = ChatClient::new(mock.clone(), test_config());
    (ChatSession::new(client, tx), rx)
}

/// One SSE frame per event, as the backend writes them.
pub fn sse_body(events: &[StreamEvent]) -> String {
    events.iter().map(StreamEvent::to_sse_frame).collect()
}

/// Split `body` into chunks of `size` bytes, ignoring char boundaries.
pub fn chunked(body: &str, size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(size)
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Everything published so far.
pub fn drain_updates(rx: &mut mpsc::UnboundedReceiver<ChatUpdate>) -> Vec<ChatUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}
