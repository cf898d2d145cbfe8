//! Itinerary LLM - streaming trip-plan generation
//!
//! This crate is the LLM pipeline of the travel-planning assistant: it sends
//! a natural-language trip request to a chat-completions provider, consumes
//! the token-level streamed response, progressively reconciles the growing
//! text into a structured [`Itinerary`], and finalizes to a best-effort
//! result when the stream ends. A refine mode re-streams a revised full
//! document from a previous itinerary plus feedback.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use itinerary_llm::{ItineraryService, TripPlanner};
//!
//! let planner = TripPlanner::from_env();
//! let itinerary = planner
//!     .generate("南京到上海，3天，预算2000", &mut |progress| {
//!         if let Some(partial) = progress.parsed {
//!             println!("目前已有 {} 天", partial.days.len());
//!         }
//!     })
//!     .await?;
//! ```
//!
//! Provider selection is configuration-driven: a [`PlannerSettings`]
//! snapshot (explicit, from the environment, or from a YAML file) resolves
//! to one of the supported providers with its defaults. A missing API key
//! fails the call before any network request.

mod api;
mod config;
mod planner;
pub mod prompt;
mod stream;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// =============================================================================
// Public API - Types, Errors & Service (from api/)
// =============================================================================

pub use api::{
    // Types
    Budget, BudgetBreakdown, Itinerary, ItineraryDay, ItineraryPlace, StartPoint, StreamProgress,
    TripBrief,
    // Errors
    PlannerError, PlannerResult, TransportError,
    // Service
    ItineraryService, ProgressSink,
};

// =============================================================================
// Public API - Configuration
// =============================================================================

pub use config::{PlannerSettings, ProviderKind, ResolvedProvider, SettingsError};
pub use config::keys;

// =============================================================================
// Public API - Reconciliation & Planner
// =============================================================================

pub use planner::TripPlanner;
pub use prompt::{generation_messages, refinement_messages, ChatMessage, Role};
pub use stream::{ItineraryReconciler, ParseOutcome};
