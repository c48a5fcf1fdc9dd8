//! Health check endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use super::ApiState;
use crate::gateway::Envelope;

/// Health check: adb availability plus a fresh device scan.
///
/// Always HTTP 200; an unavailable tool is reported through
/// `success: false`, matching the health contract automation clients
/// poll against.
async fn health(State(state): State<Arc<ApiState>>) -> Json<Envelope> {
    if !state.executor.probe().await {
        return Json(Envelope {
            success: false,
            message: "ADB not available or not working".to_string(),
            data: Some(serde_json::json!({
                "tool_available": false,
                "connected_devices": 0,
            })),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    let devices: Vec<String> = state
        .registry
        .refresh()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|d| d.id)
        .collect();

    Json(Envelope::ok(
        "Server is healthy",
        Some(serde_json::json!({
            "tool_available": true,
            "connected_devices": devices.len(),
            "device_list": devices,
        })),
    ))
}

/// Build the health router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}
