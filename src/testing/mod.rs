//! Mock planner for tests
//!
//! `MockPlanner` implements [`ItineraryService`] without any network
//! dependency. It behaves like the fallback path: one progress event
//! carrying the canned document, then the parsed-or-empty result.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::api::{
    Itinerary, ItineraryService, PlannerResult, ProgressSink, TransportError,
};
use crate::stream::ItineraryReconciler;

/// Behaviour when `generate()` or `refine()` is called.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Answer with this complete model document (the content string).
    Document(String),
    /// Fail with a transport error carrying this message.
    Error(String),
}

impl Default for MockBehaviour {
    fn default() -> Self {
        Self::Document(r#"{"destination":"","days":[]}"#.to_owned())
    }
}

/// Mock implementation of [`ItineraryService`].
///
/// # Example
///
/// ```rust,ignore
/// use itinerary_llm::testing::{MockBehaviour, MockPlanner};
///
/// let mock = MockPlanner::new()
///     .with_behaviour(MockBehaviour::Document(r#"{"destination":"北京","days":[]}"#.into()));
/// ```
#[derive(Debug, Default)]
pub struct MockPlanner {
    behaviour: MockBehaviour,
    generate_calls: AtomicU64,
    refine_calls: AtomicU64,
}

impl MockPlanner {
    /// Create a mock answering with the empty itinerary document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response behaviour.
    pub fn with_behaviour(mut self, behaviour: MockBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Number of times `generate()` was called.
    pub fn generate_calls(&self) -> u64 {
        self.generate_calls.load(Ordering::Relaxed)
    }

    /// Number of times `refine()` was called.
    pub fn refine_calls(&self) -> u64 {
        self.refine_calls.load(Ordering::Relaxed)
    }

    fn answer(&self, on_progress: ProgressSink<'_>) -> PlannerResult<Itinerary> {
        match &self.behaviour {
            MockBehaviour::Document(document) => {
                let mut reconciler = ItineraryReconciler::new();
                on_progress(reconciler.apply(document));
                Ok(reconciler.finalize())
            }
            MockBehaviour::Error(message) => {
                Err(TransportError::Network(message.clone()).into())
            }
        }
    }
}

#[async_trait]
impl ItineraryService for MockPlanner {
    async fn generate(
        &self,
        _description: &str,
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary> {
        self.generate_calls.fetch_add(1, Ordering::Relaxed);
        self.answer(on_progress)
    }

    async fn refine(
        &self,
        _previous: &Itinerary,
        _feedback: &str,
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary> {
        self.refine_calls.fetch_add(1, Ordering::Relaxed);
        self.answer(on_progress)
    }
}
