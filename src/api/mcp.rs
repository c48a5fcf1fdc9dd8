//! Generic command endpoint: /mcp/command
//!
//! Covers the full command set (hardware toggles, sensors, system
//! settings) for richer clients; parameter keys follow the original
//! wire contract (camelCase).

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use serde_json::Value;

use super::{ApiResult, ApiState};

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    pub command: String,
    #[serde(default)]
    pub params: Value,
    pub device_id: Option<String>,
}

/// Dispatch a named command with a free-form parameter map
async fn command(State(state): State<Arc<ApiState>>, Json(req): Json<McpRequest>) -> ApiResult {
    let envelope = state
        .gateway
        .dispatch_named(&req.command, &req.params, req.device_id.as_deref())
        .await?;
    Ok(Json(envelope))
}

/// Build the mcp router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/mcp/command", post(command))
        .with_state(state)
}
