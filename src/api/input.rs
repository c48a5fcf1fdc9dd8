//! Typed screen-interaction endpoints: /tap, /swipe, /type
//!
//! These are convenience routes for the common gestures; the full
//! command set lives behind /mcp/command. Bodies use snake_case fields.
//! Type mismatches (e.g. a string where a coordinate belongs) are
//! rejected by the Json extractor before any handler runs.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use super::{ApiResult, ApiState};
use crate::command::DeviceCommand;
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct TapRequest {
    pub x: i64,
    pub y: i64,
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub start_x: i64,
    pub start_y: i64,
    pub end_x: i64,
    pub end_y: i64,
    /// Swipe duration in milliseconds; server default applies when omitted
    pub duration: Option<u64>,
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TypeRequest {
    pub text: String,
    pub device_id: Option<String>,
}

/// Tap at the given coordinates
async fn tap(State(state): State<Arc<ApiState>>, Json(req): Json<TapRequest>) -> ApiResult {
    let envelope = state
        .gateway
        .dispatch(DeviceCommand::Tap { x: req.x, y: req.y }, req.device_id.as_deref())
        .await?;
    Ok(Json(envelope))
}

/// Swipe between two points
async fn swipe(State(state): State<Arc<ApiState>>, Json(req): Json<SwipeRequest>) -> ApiResult {
    let command = DeviceCommand::Swipe {
        start_x: req.start_x,
        start_y: req.start_y,
        end_x: req.end_x,
        end_y: req.end_y,
        duration_ms: req.duration.unwrap_or(state.config.default_duration_ms),
    };
    let envelope = state
        .gateway
        .dispatch(command, req.device_id.as_deref())
        .await?;
    Ok(Json(envelope))
}

/// Type text into the focused input field
async fn type_text(State(state): State<Arc<ApiState>>, Json(req): Json<TypeRequest>) -> ApiResult {
    if req.text.is_empty() {
        return Err(Error::InvalidParameters("parameter 'text' must not be empty".to_string()).into());
    }
    let envelope = state
        .gateway
        .dispatch(
            DeviceCommand::TypeText { text: req.text },
            req.device_id.as_deref(),
        )
        .await?;
    Ok(Json(envelope))
}

/// Build the input router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/tap", post(tap))
        .route("/swipe", post(swipe))
        .route("/type", post(type_text))
        .with_state(state)
}
