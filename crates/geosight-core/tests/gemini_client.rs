//! Gemini client against a local stub of the `generateContent` endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use geosight_core::{AnalysisRequest, GeminiClient, GeminiConfig, GeoError, LocationAnalyzer};
use serde_json::{json, Value};

#[derive(Clone, Debug)]
struct SeenRequest {
    model_action: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

async fn generate_content(
    State(stub): State<Stub>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().unwrap().push(SeenRequest {
        model_action,
        api_key,
        body,
    });
    (stub.status, Json(stub.body.clone()))
}

/// Start a stub server and return its base URL with the recorded requests.
async fn spawn_stub(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(generate_content))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

fn client_for(base_url: &str) -> GeminiClient {
    GeminiClient::new(
        GeminiConfig::new("test-key")
            .with_base_url(base_url)
            .with_model("gemini-test"),
    )
}

fn jpeg_request() -> AnalysisRequest {
    AnalysisRequest::new("/9j/4AAQSkZJRg==", "image/jpeg").unwrap()
}

fn candidate_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

fn paris(latitude: Value) -> String {
    json!({
        "thoughtProcess": "Haussmann facades and plane trees.",
        "visualCues": ["French road signage", "Plane trees"],
        "country": "France",
        "region": "Île-de-France",
        "latitude": latitude,
        "longitude": 2.35,
        "explanation": "Central Paris.",
        "confidence": 87
    })
    .to_string()
}

#[tokio::test]
async fn analyze_returns_parsed_result() {
    let (base_url, seen) = spawn_stub(StatusCode::OK, candidate_text(&paris(json!(48.85)))).await;

    let result = client_for(&base_url).analyze(jpeg_request()).await.unwrap();

    assert_eq!(result.country, "France");
    assert_eq!(result.region.as_deref(), Some("Île-de-France"));
    assert_eq!((result.latitude, result.longitude), (48.85, 2.35));
    assert_eq!(result.confidence, 87.0);
    assert_eq!(result.visual_cues.len(), 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model_action, "gemini-test:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("test-key"));

    let parts = &seen[0].body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "/9j/4AAQSkZJRg==");
    assert!(parts[1]["text"].is_string());

    let ordering = &seen[0].body["generationConfig"]["responseSchema"]["propertyOrdering"];
    assert_eq!(ordering[0], "thoughtProcess");
    assert_eq!(ordering[1], "visualCues");
}

#[tokio::test]
async fn non_numeric_latitude_defaults_to_zero() {
    let (base_url, _) =
        spawn_stub(StatusCode::OK, candidate_text(&paris(json!("not a number")))).await;

    let result = client_for(&base_url).analyze(jpeg_request()).await.unwrap();

    assert_eq!(result.latitude, 0.0);
    assert_eq!(result.longitude, 2.35);
    assert_eq!(result.country, "France");
}

#[tokio::test]
async fn service_error_is_transport_error() {
    let body = json!({
        "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
    });
    let (base_url, _) = spawn_stub(StatusCode::BAD_REQUEST, body).await;

    let err = client_for(&base_url).analyze(jpeg_request()).await.unwrap_err();

    match err {
        GeoError::Transport(message) => {
            assert!(message.contains("HTTP 400"), "{}", message);
            assert!(message.contains("API key not valid."), "{}", message);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_text_is_empty_response() {
    let body = json!({"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}});
    let (base_url, _) = spawn_stub(StatusCode::OK, body).await;

    let err = client_for(&base_url).analyze(jpeg_request()).await.unwrap_err();
    assert!(matches!(err, GeoError::EmptyResponse));
}

#[tokio::test]
async fn unparseable_text_is_malformed_response() {
    let (base_url, _) = spawn_stub(StatusCode::OK, candidate_text("Probably Lisbon?")).await;

    let err = client_for(&base_url).analyze(jpeg_request()).await.unwrap_err();
    assert!(matches!(err, GeoError::MalformedResponse(_)));
}

#[tokio::test]
async fn missing_required_field_is_malformed_response() {
    let text = json!({
        "thoughtProcess": "t",
        "visualCues": [],
        "country": "France",
        "latitude": 48.85,
        "longitude": 2.35,
        "explanation": "e"
    })
    .to_string();
    let (base_url, _) = spawn_stub(StatusCode::OK, candidate_text(&text)).await;

    let err = client_for(&base_url).analyze(jpeg_request()).await.unwrap_err();
    assert!(matches!(err, GeoError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}", addr))
        .analyze(jpeg_request())
        .await
        .unwrap_err();
    assert!(matches!(err, GeoError::Transport(_)));
}
