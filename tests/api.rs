//! API endpoint integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

mod common;
use common::{ScriptedExecutor, test_state};

fn build_app(executor: Arc<ScriptedExecutor>) -> axum::Router {
    droid_gateway::api::router(test_state(executor))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_tool_and_devices() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["tool_available"], true);
    assert_eq!(json["data"]["connected_devices"], 1);
    assert_eq!(json["data"]["device_list"][0], "abc123");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn health_degrades_when_tool_missing() {
    let executor = Arc::new(ScriptedExecutor::unavailable());
    let app = build_app(executor);

    let response = app.oneshot(get("/health")).await.unwrap();
    // Health stays 200; the envelope carries the failure
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["tool_available"], false);
}

#[tokio::test]
async fn devices_triggers_fresh_scan() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app.oneshot(get("/devices")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["devices"][0], "abc123");
    assert_eq!(executor.recorded(), vec![vec!["devices".to_string()]]);
}

#[tokio::test]
async fn root_lists_supported_commands() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let commands = json["data"]["supported_commands"].as_array().unwrap();
    assert_eq!(commands.len(), 10);
    assert!(commands.iter().any(|c| c == "tap"));
    assert!(commands.iter().any(|c| c == "setTorchState"));
}

#[tokio::test]
async fn tap_executes_and_echoes_coordinates() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json("/tap", serde_json::json!({"x": 540, "y": 960})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["x"], 540);
    assert_eq!(json["data"]["y"], 960);
    assert_eq!(json["data"]["device_id"], "abc123");

    let calls = executor.recorded();
    assert_eq!(
        calls.last().unwrap(),
        &["shell", "input", "tap", "540", "960"]
    );
}

#[tokio::test]
async fn tap_with_missing_field_is_unprocessable() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json("/tap", serde_json::json!({"x": 540})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(executor.recorded().is_empty());
}

#[tokio::test]
async fn tap_with_non_numeric_coordinate_is_unprocessable() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json(
            "/tap",
            serde_json::json!({"x": "540; reboot", "y": 960}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(executor.recorded().is_empty());
}

#[tokio::test]
async fn tap_without_devices_is_not_found() {
    let executor = Arc::new(ScriptedExecutor::no_devices());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json("/tap", serde_json::json!({"x": 1, "y": 2})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    // Discovery ran, but no command was executed
    assert_eq!(executor.recorded(), vec![vec!["devices".to_string()]]);
}

#[tokio::test]
async fn swipe_applies_default_duration() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json(
            "/swipe",
            serde_json::json!({"start_x": 100, "start_y": 800, "end_x": 100, "end_y": 200}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = executor.recorded();
    assert_eq!(
        calls.last().unwrap(),
        &["shell", "input", "swipe", "100", "800", "100", "200", "300"]
    );
}

#[tokio::test]
async fn type_escapes_text_for_device_shell() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json(
            "/type",
            serde_json::json!({"text": "Hello World!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let calls = executor.recorded();
    assert_eq!(
        calls.last().unwrap(),
        &["shell", "input", "text", "Hello%sWorld!"]
    );
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json("/type", serde_json::json!({"text": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(executor.recorded().is_empty());
}

#[tokio::test]
async fn mcp_command_covers_hardware_toggles() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json(
            "/mcp/command",
            serde_json::json!({"command": "setWifiState", "params": {"state": true}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "WiFi enabled");

    let calls = executor.recorded();
    assert_eq!(calls.last().unwrap(), &["shell", "svc", "wifi", "enable"]);
}

#[tokio::test]
async fn mcp_unknown_command_is_bad_request() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json(
            "/mcp/command",
            serde_json::json!({"command": "selfDestruct", "params": {}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(executor.recorded().is_empty());
}

#[tokio::test]
async fn mcp_missing_parameter_is_bad_request() {
    let executor = Arc::new(ScriptedExecutor::single_device());
    let app = build_app(executor.clone());

    let response = app
        .oneshot(post_json(
            "/mcp/command",
            serde_json::json!({"command": "longPress", "params": {"x": 10}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(executor.recorded().is_empty());
}

#[tokio::test]
async fn mcp_explicit_device_id_is_honored() {
    let executor = Arc::new(ScriptedExecutor::no_devices());
    let app = build_app(executor.clone());

    // Explicit id bypasses discovery entirely
    let response = app
        .oneshot(post_json(
            "/mcp/command",
            serde_json::json!({
                "command": "tap",
                "params": {"x": 5, "y": 6},
                "device_id": "emulator-5554",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(executor.recorded().len(), 1);
}
