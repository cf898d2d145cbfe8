//! Incremental UTF-8 decoding of the response byte stream
//!
//! TCP chunk boundaries do not respect character boundaries, so a multi-byte
//! character can arrive split across two chunks. The decoder keeps the
//! incomplete tail between calls and never fails: genuinely invalid
//! sequences degrade to U+FFFD.

use std::mem;

/// Stateful UTF-8 decoder for chunked byte input.
#[derive(Debug, Default)]
pub(crate) struct Utf8StreamDecoder {
    /// Bytes carried over from the previous chunk (an incomplete sequence).
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far.
    pub(crate) fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    // The prefix is known-valid; from_utf8_lossy borrows it as-is.
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid_up_to + invalid_len);
                        }
                        None => {
                            // Incomplete trailing sequence: hold it for the
                            // next chunk.
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush whatever is still pending at end of stream.
    ///
    /// A sequence that never completed is lossy-decoded rather than dropped
    /// silently or raised as an error.
    pub(crate) fn flush(&mut self) -> String {
        let rest = mem::take(&mut self.pending);
        String::from_utf8_lossy(&rest).into_owned()
    }
}
