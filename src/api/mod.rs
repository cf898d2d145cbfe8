//! Itinerary API - types, errors, and the service contract

mod error;
mod types;

use async_trait::async_trait;

pub use error::{PlannerError, PlannerResult, TransportError};
pub use types::{
    Budget, BudgetBreakdown, Itinerary, ItineraryDay, ItineraryPlace, StartPoint, StreamProgress,
    TripBrief,
};

/// Caller-supplied sink for progress updates.
///
/// Invoked synchronously, zero or more times per call, strictly in delta
/// arrival order.
pub type ProgressSink<'a> = &'a mut (dyn FnMut(StreamProgress) + Send);

/// The itinerary generation service.
///
/// Implemented by the HTTP-backed [`TripPlanner`](crate::TripPlanner) and by
/// [`testing::MockPlanner`](crate::testing::MockPlanner) for tests. Both
/// entry points share one external contract: progress updates stream in via
/// the sink, and the returned [`Itinerary`] reflects the last successful
/// parse of the complete model output (or the empty itinerary when the
/// output never parsed).
#[async_trait]
pub trait ItineraryService: Send + Sync {
    /// Generate a fresh itinerary from a free-text trip description.
    async fn generate(
        &self,
        description: &str,
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary>;

    /// Regenerate a complete itinerary from a previous one plus feedback.
    ///
    /// `previous` is read-only input; refinement produces a new value.
    async fn refine(
        &self,
        previous: &Itinerary,
        feedback: &str,
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary>;
}
