//! Streaming pipeline: bytes → UTF-8 text → SSE events → content deltas
//!
//! Per-call state (decoder carry-over, line buffer) lives inside the stream
//! itself, so concurrent calls never share anything.

mod decoder;
mod reconciler;
mod sse;

use futures::{Stream, StreamExt};

pub use reconciler::{ItineraryReconciler, ParseOutcome};

use crate::api::TransportError;
use decoder::Utf8StreamDecoder;
use sse::{extract_delta, SseEvent, SseLineBuffer};

/// Turn a raw response byte stream into a stream of content deltas.
///
/// Chunk boundaries are arbitrary: a multi-byte character or an SSE line may
/// span chunks. The stream ends at the `[DONE]` sentinel or when the bytes
/// run out, whichever comes first; a transport error ends it after being
/// yielded. Malformed events are skipped, never fatal.
pub(crate) fn delta_stream<S, B>(bytes: S) -> impl Stream<Item = Result<String, TransportError>>
where
    S: Stream<Item = Result<B, TransportError>>,
    B: AsRef<[u8]>,
{
    async_stream::stream! {
        futures::pin_mut!(bytes);
        let mut decoder = Utf8StreamDecoder::new();
        let mut lines = SseLineBuffer::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            let text = decoder.decode(chunk.as_ref());
            for event in lines.feed(&text) {
                match event {
                    SseEvent::Data(data) => {
                        if let Some(content) = extract_delta(&data) {
                            yield Ok(content);
                        }
                    }
                    SseEvent::Done => return,
                }
            }
        }

        // Stream ended without [DONE]: drain what the decoder still holds
        // and treat any unterminated final line as a last event.
        let tail = decoder.flush();
        let mut events = lines.feed(&tail);
        events.extend(lines.flush());
        for event in events {
            match event {
                SseEvent::Data(data) => {
                    if let Some(content) = extract_delta(&data) {
                        yield Ok(content);
                    }
                }
                SseEvent::Done => return,
            }
        }
    }
}
