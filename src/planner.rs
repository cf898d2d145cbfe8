//! HTTP-backed itinerary planner
//!
//! One request per call: resolve the provider (fail fast on a missing
//! credential), shape the chat-completions body, then either consume the
//! event stream delta by delta or fall back to a single buffered
//! round trip when no event stream is available. Both paths end in the same
//! finalization: the last successful parse of the full accumulator, or the
//! empty itinerary.

use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{
    Itinerary, ItineraryService, PlannerResult, ProgressSink, TransportError,
};
use crate::config::PlannerSettings;
use crate::prompt::{self, ChatMessage};
use crate::stream::{delta_stream, ItineraryReconciler};

/// Connection timeout. No overall request timeout is set: a streaming
/// response legitimately stays open for as long as the model keeps talking.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// LLM-backed trip planner speaking the chat-completions protocol.
///
/// Cheap to clone per call site conventions are not needed: the planner
/// holds no per-call state, so one instance serves concurrent calls. Each
/// call owns its accumulator, decoder state and progress sink.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    client: Client,
    settings: PlannerSettings,
    streaming: bool,
}

impl TripPlanner {
    /// Create a planner over a settings snapshot. Streaming is on by
    /// default.
    pub fn new(settings: PlannerSettings) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");
        Self { client, settings, streaming: true }
    }

    /// Create a planner configured from the environment.
    pub fn from_env() -> Self {
        Self::new(PlannerSettings::from_env())
    }

    /// Toggle streaming. With streaming off, every call takes the
    /// single-round-trip fallback path.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Replace the connection timeout (default 30 seconds). This only bounds
    /// connection establishment; an open stream has no overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        self
    }

    /// The settings snapshot this planner was built over.
    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Shared request/consume/finalize flow behind both operations.
    async fn run(
        &self,
        messages: &[ChatMessage],
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary> {
        let resolved = self.settings.resolve()?;
        debug!(
            provider = resolved.kind.as_str(),
            model = %resolved.model,
            streaming = self.streaming,
            "requesting itinerary"
        );

        let body = ChatRequest {
            model: &resolved.model,
            messages,
            response_format: ResponseFormat::json_object(),
            stream: self.streaming,
        };

        let response = self
            .client
            .post(&resolved.endpoint)
            .bearer_auth(&resolved.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body }.into());
        }

        if self.streaming && is_event_stream(&response) {
            let bytes = response
                .bytes_stream()
                .map_err(|err| TransportError::Network(err.to_string()));
            return consume_stream(bytes, on_progress).await.map_err(Into::into);
        }

        // Fallback: the transport gave us no event stream (or streaming was
        // disabled). One buffered round trip, one progress event, same
        // external contract.
        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let mut reconciler = ItineraryReconciler::new();
        on_progress(reconciler.apply(&content));
        Ok(reconciler.finalize())
    }
}

#[async_trait]
impl ItineraryService for TripPlanner {
    async fn generate(
        &self,
        description: &str,
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary> {
        let messages = prompt::generation_messages(description);
        self.run(&messages, on_progress).await
    }

    async fn refine(
        &self,
        previous: &Itinerary,
        feedback: &str,
        on_progress: ProgressSink<'_>,
    ) -> PlannerResult<Itinerary> {
        let messages = prompt::refinement_messages(previous, feedback);
        self.run(&messages, on_progress).await
    }
}

/// Drive the delta stream through a fresh reconciler, emitting one progress
/// update per delta, and finalize when the stream ends.
pub(crate) async fn consume_stream<S, B>(
    bytes: S,
    on_progress: ProgressSink<'_>,
) -> Result<Itinerary, TransportError>
where
    S: Stream<Item = Result<B, TransportError>>,
    B: AsRef<[u8]>,
{
    let deltas = delta_stream(bytes);
    futures::pin_mut!(deltas);

    let mut reconciler = ItineraryReconciler::new();
    while let Some(delta) = deltas.next().await {
        on_progress(reconciler.apply(&delta?));
    }
    Ok(reconciler.finalize())
}

fn is_event_stream(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("text/event-stream"))
        .unwrap_or(false)
}

// Chat-completions wire types.

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self { format_type: "json_object" }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
