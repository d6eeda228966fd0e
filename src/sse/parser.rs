//! Line classification and payload decoding.

use crate::error::DecodeError;
use crate::sse::events::{SseLine, StreamEvent};

/// Classify a single SSE line (without its line terminator).
pub fn parse_sse_line(line: &str) -> SseLine<'_> {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(comment) = line.strip_prefix(':') {
        return SseLine::Comment(comment.trim());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        // A single leading space belongs to the framing, not the payload
        return SseLine::Data(rest.strip_prefix(' ').unwrap_or(rest));
    }

    SseLine::Other(line)
}

/// Decode the JSON payload of a `data:` line.
pub fn parse_stream_event(payload: &str) -> Result<StreamEvent, DecodeError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Comment("keep-alive"));
        assert_eq!(parse_sse_line(":"), SseLine::Comment(""));
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line(r#"data: {"type":"token"}"#),
            SseLine::Data(r#"{"type":"token"}"#)
        );
        assert_eq!(parse_sse_line(r#"data:{"x":1}"#), SseLine::Data(r#"{"x":1}"#));
        // Only one space is framing
        assert_eq!(parse_sse_line("data:  x"), SseLine::Data(" x"));
    }

    #[test]
    fn test_parse_other_lines() {
        assert_eq!(parse_sse_line("event: token"), SseLine::Other("event: token"));
        assert_eq!(parse_sse_line("id: 7"), SseLine::Other("id: 7"));
        assert_eq!(parse_sse_line("Data: x"), SseLine::Other("Data: x"));
        assert_eq!(parse_sse_line(" data: x"), SseLine::Other(" data: x"));
    }

    #[test]
    fn test_parse_stream_event() {
        let event = parse_stream_event(r#"{"type":"status","content":"Processing your request..."}"#)
            .unwrap();
        assert_eq!(event, StreamEvent::status("Processing your request..."));
    }

    #[test]
    fn test_parse_stream_event_invalid_json() {
        let result = parse_stream_event("{\"type\":\"token\",");
        assert!(matches!(result, Err(DecodeError::InvalidPayload(_))));
    }

    #[test]
    fn test_parse_stream_event_empty_payload() {
        assert!(parse_stream_event("").is_err());
    }
}
