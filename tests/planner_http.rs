//! End-to-end planner tests against in-process HTTP stubs.
//!
//! Each test spins up a local server playing the provider role: an SSE
//! endpoint for the streaming path, a JSON endpoint for the fallback path,
//! and error endpoints for the transport failure cases. No external network
//! access is involved.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use serial_test::serial;

use itinerary_llm::{
    Itinerary, ItineraryDay, ItineraryService, PlannerError, PlannerSettings, ProviderKind,
    StreamProgress, TransportError, TripPlanner,
};

/// Serve a router on an ephemeral port, returning its base URL.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn settings_for(base: &str) -> PlannerSettings {
    PlannerSettings {
        provider: ProviderKind::OpenAi,
        openai_key: Some("sk-test".to_owned()),
        openai_base: Some(base.to_owned()),
        ..Default::default()
    }
}

fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        let event = serde_json::json!({"choices": [{"delta": {"content": delta}}]});
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn chat_envelope(content: &str) -> String {
    serde_json::json!({"choices": [{"message": {"content": content}}]}).to_string()
}

#[tokio::test]
#[serial]
async fn streaming_generation_assembles_itinerary() {
    let body = sse_body(&["{\"destination\"", ":\"上海\",\"days\":[]}"]);
    let router = Router::new().route(
        "/chat/completions",
        post(move || async move {
            ([(header::CONTENT_TYPE, "text/event-stream")], body.clone())
        }),
    );
    let base = spawn_stub(router).await;

    let planner = TripPlanner::new(settings_for(&base));
    let mut updates: Vec<StreamProgress> = Vec::new();
    let result = planner
        .generate("南京到上海，3天，预算2000", &mut |p| updates.push(p))
        .await
        .unwrap();

    assert_eq!(result.destination, "上海");
    assert!(result.days.is_empty());
    assert!(!updates.is_empty());
    // Accumulator growth is prefix-monotonic across updates.
    for pair in updates.windows(2) {
        assert!(pair[1].raw_text.starts_with(&pair[0].raw_text));
    }
    let last = updates.last().unwrap();
    assert_eq!(last.parsed.as_ref(), Some(&result));
}

#[tokio::test]
#[serial]
async fn fallback_emits_exactly_one_update_equal_to_result() {
    let envelope = chat_envelope("{\"destination\":\"上海\",\"days\":[]}");
    let router = Router::new().route(
        "/chat/completions",
        post(move || async move {
            ([(header::CONTENT_TYPE, "application/json")], envelope.clone())
        }),
    );
    let base = spawn_stub(router).await;

    // Streaming disabled: the planner takes the single-round-trip path.
    let planner = TripPlanner::new(settings_for(&base)).with_streaming(false);
    let mut updates: Vec<StreamProgress> = Vec::new();
    let result = planner
        .generate("去上海玩三天", &mut |p| updates.push(p))
        .await
        .unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].parsed.as_ref(), Some(&result));
    assert_eq!(result.destination, "上海");
}

#[tokio::test]
#[serial]
async fn streaming_request_falls_back_when_body_is_not_an_event_stream() {
    // Provider ignores the stream flag and answers with plain JSON.
    let envelope = chat_envelope("{\"destination\":\"杭州\",\"days\":[]}");
    let router = Router::new().route(
        "/chat/completions",
        post(move || async move {
            ([(header::CONTENT_TYPE, "application/json")], envelope.clone())
        }),
    );
    let base = spawn_stub(router).await;

    let planner = TripPlanner::new(settings_for(&base));
    let mut updates = 0usize;
    let result = planner.generate("去杭州", &mut |_| updates += 1).await.unwrap();

    assert_eq!(updates, 1);
    assert_eq!(result.destination, "杭州");
}

#[tokio::test]
#[serial]
async fn http_401_rejects_with_transport_error_and_no_progress() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let base = spawn_stub(router).await;

    let planner = TripPlanner::new(settings_for(&base));
    let mut updates = 0usize;
    let err = planner.generate("去上海", &mut |_| updates += 1).await.unwrap_err();

    assert_eq!(updates, 0);
    match err {
        PlannerError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected HTTP status error, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn missing_credential_fails_before_any_request() {
    let hits = Arc::new(AtomicU64::new(0));
    let router = Router::new()
        .route(
            "/chat/completions",
            post(|State(hits): State<Arc<AtomicU64>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::OK
            }),
        )
        .with_state(Arc::clone(&hits));
    let base = spawn_stub(router).await;

    let settings = PlannerSettings {
        provider: ProviderKind::OpenAi,
        openai_base: Some(base),
        // No key configured for the selected provider.
        dashscope_key: Some("sk-wrong-provider".to_owned()),
        ..Default::default()
    };

    let planner = TripPlanner::new(settings);
    let mut updates = 0usize;
    let err = planner.generate("去上海", &mut |_| updates += 1).await.unwrap_err();

    assert!(matches!(err, PlannerError::MissingCredential { provider: "openai" }));
    assert_eq!(updates, 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial]
async fn refinement_sends_previous_itinerary_and_returns_updated_document() {
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let envelope = chat_envelope(
        "{\"destination\":\"北京\",\"days\":[{\"date\":\"2025-12-01\",\"activities\":[]}]}",
    );
    let router = Router::new()
        .route(
            "/chat/completions",
            post(
                move |State(captured): State<Arc<Mutex<Option<String>>>>, body: String| async move {
                    *captured.lock().unwrap() = Some(body);
                    ([(header::CONTENT_TYPE, "application/json")], envelope.clone())
                },
            ),
        )
        .with_state(Arc::clone(&captured));
    let base = spawn_stub(router).await;

    let previous = Itinerary {
        destination: "东京".to_owned(),
        days: vec![ItineraryDay {
            date: "2025-12-01".to_owned(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let planner = TripPlanner::new(settings_for(&base)).with_streaming(false);
    let mut updates = 0usize;
    let result = planner
        .refine(&previous, "改成北京", &mut |_| updates += 1)
        .await
        .unwrap();

    assert_eq!(result.destination, "北京");
    assert_eq!(updates, 1);

    // The request embedded the serialized previous itinerary and the
    // literal feedback text.
    let request_body = captured.lock().unwrap().take().unwrap();
    assert!(request_body.contains("东京"));
    assert!(request_body.contains("2025-12-01"));
    assert!(request_body.contains("改成北京"));
    assert!(request_body.contains("\"response_format\":{\"type\":\"json_object\"}"));
}

#[tokio::test]
#[serial]
async fn connection_failure_maps_to_network_error() {
    // Nothing listens on this port; bind-then-drop guarantees it is free.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let planner = TripPlanner::new(settings_for(&base));
    let err = planner.generate("去上海", &mut |_| {}).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Transport(TransportError::Network(_))
    ));
}
