//! SSE (Server-Sent Events) stream decoding
//!
//! The chat backend frames every event as one line:
//!
//! ```text
//! data: {"type":"token","content":"Hi"}
//!
//! ```
//!
//! Only `data:` lines carry events; blank separators, `:` comments and any
//! other field lines are ignored.
//!
//! # Module structure
//! - `events` - Event type definitions (StreamEvent, SseLine)
//! - `parser` - Line classification and payload decoding
//! - `decoder` - StreamDecoder, turning a chunked byte stream into events

mod decoder;
mod events;
mod parser;

pub use decoder::{DecodeStats, StreamDecoder, DEFAULT_MAX_LINE_BYTES};
pub use events::{SseLine, StreamEvent};
pub use parser::{parse_sse_line, parse_stream_event};
