//! Hospital chat - streaming client for the hospital assistant backend
//!
//! The core is [`sse::StreamDecoder`], which turns a chunked SSE body into
//! typed events, and [`state::ConversationState`], which folds those events
//! into conversation snapshots. [`session::ChatSession`] wires both to the
//! backend through [`client::ChatClient`].

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod locale;
pub mod models;
pub mod session;
pub mod sse;
pub mod state;
pub mod traits;

pub use client::ChatClient;
pub use config::ChatConfig;
pub use error::{BusyError, DecodeError, SendError, TransportError};
pub use locale::Locale;
pub use session::{ChatSession, ChatUpdate, Notice, SendOutcome, SendSummary, Severity};
pub use sse::{DecodeStats, StreamDecoder, StreamEvent};
pub use state::ConversationState;
