//! SSE framing and delta extraction
//!
//! The provider streams server-sent events: one `data:` line per event,
//! carrying either a JSON chunk with a nested content delta or the `[DONE]`
//! sentinel. Network chunks do not align with event boundaries, so lines are
//! reassembled through a carry-over buffer. Anything that is not a
//! well-formed data line is ignored; malformed provider output must never
//! abort the stream.

use std::mem;

use serde::Deserialize;
use tracing::debug;

/// Stream-termination sentinel payload.
const DONE_SENTINEL: &str = "[DONE]";

/// A complete SSE event recognized in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseEvent {
    /// Payload of a `data:` line (prefix stripped), still unparsed.
    Data(String),
    /// The `[DONE]` terminator; carries no content.
    Done,
}

/// Line reassembly buffer for decoded SSE text.
#[derive(Debug, Default)]
pub(crate) struct SseLineBuffer {
    /// Text of the current unterminated line.
    buffer: String,
}

impl SseLineBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed decoded text, returning every complete event it finishes.
    ///
    /// A trailing partial line (no terminating newline) stays buffered for
    /// the next call. Blank lines, comments and non-data fields yield
    /// nothing.
    pub(crate) fn feed(&mut self, text: &str) -> Vec<SseEvent> {
        self.buffer.push_str(text);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let rest = self.buffer.split_off(newline + 1);
            let mut line = mem::replace(&mut self.buffer, rest);
            line.truncate(line.trim_end_matches(['\n', '\r']).len());

            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Treat any remaining buffered text as a final line at end of stream.
    pub(crate) fn flush(&mut self) -> Option<SseEvent> {
        let line = mem::take(&mut self.buffer);
        parse_line(&line)
    }
}

/// Recognize one line. Only lines with the `data:` field name at column
/// zero count; an indented line is not a data field. Everything else is
/// dropped without complaint.
fn parse_line(line: &str) -> Option<SseEvent> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == DONE_SENTINEL {
        return Some(SseEvent::Done);
    }
    Some(SseEvent::Data(payload.to_owned()))
}

/// Pull the incremental content delta out of one event payload.
///
/// Expected shape: `{"choices":[{"delta":{"content":"..."}}]}`. A payload
/// that fails to parse is discarded silently — the stream keeps going.
pub(crate) fn extract_delta(data: &str) -> Option<String> {
    match serde_json::from_str::<StreamPayload>(data) {
        Ok(payload) => payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content),
        Err(err) => {
            debug!(error = %err, "discarding malformed stream event");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamPayload {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multiple_events_in_one_chunk() {
        let mut lines = SseLineBuffer::new();
        let events = lines.feed("data: {\"a\":1}\ndata: {\"b\":2}\n");
        assert_eq!(
            events,
            vec![
                SseEvent::Data("{\"a\":1}".to_owned()),
                SseEvent::Data("{\"b\":2}".to_owned()),
            ]
        );
    }

    #[test]
    fn holds_partial_trailing_line() {
        let mut lines = SseLineBuffer::new();
        assert!(lines.feed("data: {\"cho").is_empty());
        let events = lines.feed("ices\":[]}\n");
        assert_eq!(events, vec![SseEvent::Data("{\"choices\":[]}".to_owned())]);
    }

    #[test]
    fn ignores_blank_lines_comments_and_other_fields() {
        let mut lines = SseLineBuffer::new();
        let events = lines.feed("\n: keep-alive\nevent: message\nid: 3\nretry: 100\n");
        assert!(events.is_empty());
    }

    #[test]
    fn recognizes_done_sentinel() {
        let mut lines = SseLineBuffer::new();
        assert_eq!(lines.feed("data: [DONE]\n"), vec![SseEvent::Done]);
    }

    #[test]
    fn tolerates_crlf_and_missing_space() {
        let mut lines = SseLineBuffer::new();
        let events = lines.feed("data:{\"x\":1}\r\n");
        assert_eq!(events, vec![SseEvent::Data("{\"x\":1}".to_owned())]);
    }

    #[test]
    fn rejects_indented_data_lines() {
        let mut lines = SseLineBuffer::new();
        let events = lines.feed("  data: {\"x\":1}\n\tdata: [DONE]\n");
        assert!(events.is_empty());
    }

    #[test]
    fn flush_emits_unterminated_final_line() {
        let mut lines = SseLineBuffer::new();
        assert!(lines.feed("data: [DONE]").is_empty());
        assert_eq!(lines.flush(), Some(SseEvent::Done));
    }

    #[test]
    fn extract_delta_reads_nested_content() {
        let delta = extract_delta(r#"{"choices":[{"delta":{"content":"{\"destination\""}}]}"#);
        assert_eq!(delta.as_deref(), Some("{\"destination\""));
    }

    #[test]
    fn extract_delta_discards_malformed_json() {
        assert_eq!(extract_delta("{\"choices\":[{\"delta\""), None);
        assert_eq!(extract_delta("not json at all"), None);
    }

    #[test]
    fn extract_delta_handles_missing_content() {
        assert_eq!(extract_delta(r#"{"choices":[{"delta":{}}]}"#), None);
        assert_eq!(extract_delta(r#"{"choices":[]}"#), None);
    }

    #[test]
    fn malformed_line_does_not_stop_later_lines() {
        let mut lines = SseLineBuffer::new();
        let events =
            lines.feed("data: {broken\ndata: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n");
        assert_eq!(events.len(), 2);
        // First payload fails JSON extraction, second still yields a delta.
        assert_eq!(extract_delta(match &events[0] {
            SseEvent::Data(d) => d,
            SseEvent::Done => unreachable!(),
        }), None);
        assert_eq!(extract_delta(match &events[1] {
            SseEvent::Data(d) => d,
            SseEvent::Done => unreachable!(),
        }).as_deref(), Some("ok"));
    }
}
