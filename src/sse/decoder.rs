//! Chunked byte stream to [`StreamEvent`] decoding.
//!
//! The transport hands over chunks of arbitrary size, so a record may be
//! split anywhere, including inside a multi-byte UTF-8 character. Bytes are
//! carried over between chunks and a record is only decoded once its line
//! terminator has arrived (or the transport has completed).

use bytes::{Bytes, BytesMut};
use futures::stream::{FusedStream, Stream};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{DecodeError, TransportError};
use crate::sse::events::{SseLine, StreamEvent};
use crate::sse::parser::{parse_sse_line, parse_stream_event};

/// Default upper bound for a single buffered line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Counters for one decoded stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Events successfully decoded
    pub events: u64,
    /// `data:` records dropped because they could not be decoded
    pub dropped: u64,
}

/// Decodes a chat SSE body into a stream of [`StreamEvent`]s.
///
/// Items are `Ok(event)` in arrival order, or a single terminal
/// `Err(TransportError)` if the body breaks off. Malformed records never
/// surface as items; see [`DecodeStats::dropped`].
///
/// The wrapped body is dropped as soon as it completes or fails, and also
/// when the decoder itself is dropped, so abandoning iteration releases the
/// connection.
pub struct StreamDecoder<S> {
    inner: Option<S>,
    buffer: BytesMut,
    /// Bytes of `buffer` already known to contain no newline
    scanned: usize,
    /// Skipping the remainder of an over-long line
    discarding: bool,
    pending: VecDeque<StreamEvent>,
    stats: DecodeStats,
    max_line_bytes: usize,
}

impl<S> StreamDecoder<S>
where
    S: Stream<Item = Result<Bytes, TransportError>> + Unpin,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner: Some(inner),
            buffer: BytesMut::new(),
            scanned: 0,
            discarding: false,
            pending: VecDeque::new(),
            stats: DecodeStats::default(),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// Limit how many bytes a single line may occupy before it is dropped.
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes.max(1);
        self
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Whether the underlying body is still held.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        while let Some(offset) = self.buffer[self.scanned..]
            .iter()
            .position(|b| *b == b'\n')
        {
            let newline = self.scanned + offset;
            let line = self.buffer.split_to(newline + 1);
            self.scanned = 0;

            if self.discarding {
                self.discarding = false;
                continue;
            }
            self.process_line(&line[..newline]);
        }

        if self.buffer.len() > self.max_line_bytes {
            if !self.discarding {
                self.record_drop(DecodeError::LineTooLong {
                    limit: self.max_line_bytes,
                });
                self.discarding = true;
            }
            self.buffer.clear();
        }
        self.scanned = self.buffer.len();
    }

    fn process_line(&mut self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        if line.len() > self.max_line_bytes {
            self.record_drop(DecodeError::LineTooLong {
                limit: self.max_line_bytes,
            });
            return;
        }

        let Ok(text) = std::str::from_utf8(line) else {
            // Only a record we would have decoded counts as dropped
            if line.starts_with(b"data:") {
                self.record_drop(DecodeError::InvalidUtf8);
            }
            return;
        };

        if let SseLine::Data(payload) = parse_sse_line(text) {
            match parse_stream_event(payload) {
                Ok(event) => {
                    tracing::trace!(event_type = event.event_type_name(), "Decoded SSE event");
                    self.stats.events += 1;
                    self.pending.push_back(event);
                }
                Err(err) => self.record_drop(err),
            }
        }
    }

    fn record_drop(&mut self, err: DecodeError) {
        self.stats.dropped += 1;
        tracing::warn!(error = %err, dropped = self.stats.dropped, "Dropping malformed SSE record");
    }

    /// The transport completed: an unterminated tail is a final line.
    fn finish(&mut self) {
        if !self.discarding && !self.buffer.is_empty() {
            let tail = self.buffer.split();
            self.process_line(&tail);
        }
        tracing::debug!(
            events = self.stats.events,
            dropped = self.stats.dropped,
            "SSE stream completed"
        );
        self.release();
    }

    fn release(&mut self) {
        self.inner = None;
        self.buffer.clear();
        self.scanned = 0;
        self.discarding = false;
    }
}

impl<S> Stream for StreamDecoder<S>
where
    S: Stream<Item = Result<Bytes, TransportError>> + Unpin,
{
    type Item = Result<StreamEvent, TransportError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            let Some(inner) = this.inner.as_mut() else {
                return Poll::Ready(None);
            };

            match Pin::new(inner).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => this.feed(&chunk),
                Poll::Ready(Some(Err(err))) => {
                    tracing::error!(error = %err, "SSE transport failed mid-stream");
                    this.release();
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => this.finish(),
            }
        }
    }
}

impl<S> FusedStream for StreamDecoder<S>
where
    S: Stream<Item = Result<Bytes, TransportError>> + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none() && self.pending.is_empty()
    }
}

impl<S> std::fmt::Debug for StreamDecoder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("open", &self.inner.is_some())
            .field("buffered", &self.buffer.len())
            .field("pending", &self.pending.len())
            .field("stats", &self.stats)
            .finish()
    }
}
