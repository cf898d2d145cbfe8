//! Configuration-driven provider selection
//!
//! Settings arrive as a read-only snapshot (from the hosting UI, the
//! environment, or a YAML file) and resolve into a concrete endpoint,
//! credential and model before any network call.

pub mod keys;
mod settings;

pub use settings::{PlannerSettings, ProviderKind, ResolvedProvider, SettingsError};
