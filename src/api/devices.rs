//! Device listing endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use super::{ApiResult, ApiState};
use crate::gateway::Envelope;

/// List connected devices; always triggers a fresh discovery scan
async fn list_devices(State(state): State<Arc<ApiState>>) -> ApiResult {
    let devices: Vec<String> = state
        .registry
        .refresh()
        .await?
        .into_iter()
        .map(|d| d.id)
        .collect();

    Ok(Json(Envelope::ok(
        format!("Found {} connected devices", devices.len()),
        Some(serde_json::json!({ "devices": devices })),
    )))
}

/// Build the devices router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/devices", get(list_devices))
        .with_state(state)
}
