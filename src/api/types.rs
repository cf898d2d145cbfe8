use serde::{Deserialize, Serialize};

/// Structured trip plan produced by the model.
///
/// Deserialization is deliberately lenient: every field defaults, unknown
/// fields are ignored, and no validation happens beyond "parses as this
/// shape". A value parsed mid-stream may be structurally incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Itinerary {
    /// Destination as free text. Required once finalized, may be empty before.
    pub destination: String,
    /// Days in itinerary order (day 1..n).
    pub days: Vec<ItineraryDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Optional origin descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<StartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
}

impl Itinerary {
    /// The minimal well-formed itinerary: `{"destination": "", "days": []}`.
    ///
    /// Finalization falls back to this when the model never produced a
    /// parseable document.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One day of the itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryDay {
    /// Date string in whatever format the model produced.
    pub date: String,
    /// Activities in visit order.
    pub activities: Vec<ItineraryPlace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
}

/// A single place or activity within a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryPlace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// Optional trip origin with address and/or coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// Budget estimate attached to an itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    /// Currency code, e.g. "CNY".
    pub currency: String,
    pub total: f64,
    pub breakdown: BudgetBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Per-category budget amounts. All categories are optional and sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transportation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lodging: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<f64>,
}

/// Snapshot handed to the progress callback after each applied delta.
///
/// `raw_text` is the full accumulator so far; it only ever grows within one
/// call. `parsed` is present only when the accumulator currently parses as
/// an [`Itinerary`] — treat it as best-effort, it may be absent on any
/// given update.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamProgress {
    /// Everything the model has produced so far in this call.
    pub raw_text: String,
    /// Best-effort parse of `raw_text`, if it is currently valid JSON.
    pub parsed: Option<Itinerary>,
}

/// Structured plan-form input, rendered into the free-text trip description
/// consumed by the prompt builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripBrief {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_cny: Option<f64>,
    pub people: u32,
    /// Free-text preferences, possibly transcribed from voice input.
    pub preferences: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_address: Option<String>,
}

impl TripBrief {
    /// Render the brief as the free-text description fed to the generator.
    pub fn to_description(&self) -> String {
        let mut text = format!(
            "目的地: {}\n日期: {} 到 {}\n",
            self.destination, self.start_date, self.end_date
        );
        if let Some(budget) = self.budget_cny {
            text.push_str(&format!("预算(人民币): {budget}\n"));
        }
        text.push_str(&format!("同行人数: {}\n偏好: {}", self.people, self.preferences));
        if let Some(ref start) = self.start_address {
            text.push_str(&format!("\n出发地: {start}"));
        }
        text
    }
}
