//! Conversation state.
//!
//! [`ConversationState`] is an immutable snapshot. Every operation takes the
//! current snapshot and returns the next one, so the UI layer can render
//! each intermediate state and keep older snapshots without them changing
//! underneath it.

mod conversation;

pub use conversation::ConversationState;
