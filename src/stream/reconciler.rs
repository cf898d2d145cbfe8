//! Progressive JSON reconciliation
//!
//! One reconciler exists per in-flight call. Deltas are only ever appended,
//! so the accumulator grows monotonically; after each append the full
//! document is re-parsed. Failures to parse are routine while the document
//! is still incomplete — they are not errors.

use tracing::warn;

use crate::api::{Itinerary, StreamProgress};

/// Outcome of one parse attempt over the accumulator.
///
/// `Incomplete` means "not currently parseable", which during streaming
/// usually just means more deltas are coming. Callers who need to tell
/// "not yet parseable" apart from "parsed but semantically empty" can match
/// on this instead of [`StreamProgress::parsed`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The accumulator currently parses as an itinerary document.
    Parsed(Itinerary),
    /// The accumulator is not valid JSON (yet).
    Incomplete,
}

/// Per-call accumulator with best-effort parsing.
#[derive(Debug, Default)]
pub struct ItineraryReconciler {
    accumulator: String,
}

impl ItineraryReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one delta and produce the progress snapshot for it.
    pub fn apply(&mut self, delta: &str) -> StreamProgress {
        self.accumulator.push_str(delta);
        StreamProgress {
            raw_text: self.accumulator.clone(),
            parsed: match self.attempt() {
                ParseOutcome::Parsed(itinerary) => Some(itinerary),
                ParseOutcome::Incomplete => None,
            },
        }
    }

    /// Parse the current accumulator. Pure: repeated attempts over the same
    /// accumulator yield the same outcome.
    pub fn attempt(&self) -> ParseOutcome {
        match serde_json::from_str(&self.accumulator) {
            Ok(itinerary) => ParseOutcome::Parsed(itinerary),
            Err(_) => ParseOutcome::Incomplete,
        }
    }

    /// The full accumulated text so far.
    pub fn raw_text(&self) -> &str {
        &self.accumulator
    }

    /// Commit to a final result once the stream has ended.
    ///
    /// An unparseable final accumulator is an expected, recoverable
    /// condition: the result degrades to [`Itinerary::empty`] instead of
    /// failing the call.
    pub fn finalize(self) -> Itinerary {
        match self.attempt() {
            ParseOutcome::Parsed(itinerary) => itinerary,
            ParseOutcome::Incomplete => {
                if !self.accumulator.trim().is_empty() {
                    warn!(
                        len = self.accumulator.len(),
                        "final model output was not valid JSON; returning empty itinerary"
                    );
                }
                Itinerary::empty()
            }
        }
    }
}
