use super::types::{GeminiConfig, DEFAULT_BASE_URL, MODELS};
use super::GeminiAdapter;
use crate::adapter::{ChatAdapter, ChatOutcome};
use crate::providers::test_support::{spawn_server, UNREACHABLE_URL};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = GeminiConfig::default();
    assert!(config.api_key.is_none());
    assert_eq!(config.model, "gemini-2.0-flash-exp");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert!(MODELS.contains(&config.model.as_str()));
}

#[test]
fn test_config_debug_masks_key() {
    let config = GeminiConfig::new("AIzaSy1234567890abcdefgh");
    let debug_str = format!("{:?}", config);

    assert!(!debug_str.contains("1234567890"));
    assert!(debug_str.contains("AIza...efgh"));
}

#[tokio::test]
async fn test_missing_key_is_not_configured() {
    let adapter = GeminiAdapter::new(GeminiConfig::default()).unwrap();
    assert!(!adapter.is_configured().await);
    assert!(adapter
        .chat("hi")
        .await
        .to_wire()
        .starts_with("❌ Gemini not configured"));
}

#[tokio::test]
async fn test_chat_success_joins_parts() {
    let app = Router::new().route(
        "/models/:call",
        post(
            |Path(call): Path<String>,
             Query(query): Query<HashMap<String, String>>,
             Json(body): Json<Value>| async move {
                assert_eq!(call, "gemini-1.5-flash:generateContent");
                assert_eq!(query.get("key").map(String::as_str), Some("AIza-test"));
                assert_eq!(body["contents"][0]["parts"][0]["text"], "Say hi");
                Json(json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{ "text": "Hi" }, { "text": " there" }]
                        },
                        "finishReason": "STOP"
                    }]
                }))
            },
        ),
    );
    let base = spawn_server(app).await;

    let adapter = GeminiAdapter::new(
        GeminiConfig::new("AIza-test")
            .with_base_url(base)
            .with_model("gemini-1.5-flash"),
    )
    .unwrap();
    assert_eq!(adapter.model(), "gemini-1.5-flash");

    let outcome = adapter.chat("Say hi").await;
    assert_eq!(outcome, ChatOutcome::Success("Hi there".to_string()));
}

#[tokio::test]
async fn test_blocked_prompt_is_failure() {
    let app = Router::new().route(
        "/models/:call",
        post(|| async { Json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })) }),
    );
    let base = spawn_server(app).await;

    let adapter = GeminiAdapter::new(GeminiConfig::new("k").with_base_url(base)).unwrap();
    let wire = adapter.chat("q").await.to_wire();

    assert!(wire.starts_with("❌ Gemini Error:"));
    assert!(wire.contains("SAFETY"));
}

#[tokio::test]
async fn test_invalid_key_is_failure() {
    let app = Router::new().route(
        "/models/:call",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": {
                        "code": 400,
                        "message": "API key not valid. Please pass a valid API key.",
                        "status": "INVALID_ARGUMENT"
                    }
                })),
            )
        }),
    );
    let base = spawn_server(app).await;

    let adapter = GeminiAdapter::new(GeminiConfig::new("AIza-bad-key-123").with_base_url(base)).unwrap();
    let wire = adapter.chat("q").await.to_wire();

    assert!(wire.contains("authentication"));
    assert!(!wire.contains("AIza-bad-key-123"));
}

#[tokio::test]
async fn test_unreachable_failure_hides_key() {
    let adapter = GeminiAdapter::new(
        GeminiConfig::new("AIza-secret-key-999")
            .with_base_url(UNREACHABLE_URL)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    let wire = adapter.chat("q").await.to_wire();
    assert!(wire.starts_with("❌ Gemini Error:"));
    assert!(!wire.contains("AIza-secret-key-999"));
}
