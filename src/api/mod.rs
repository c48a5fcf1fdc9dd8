//! HTTP API server for the droid gateway
//!
//! Every route is a thin adapter over [`CommandGateway`]; no dispatch
//! logic lives in handlers.

pub mod devices;
pub mod health;
pub mod input;
pub mod mcp;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::command::COMMAND_NAMES;
use crate::config::Config;
use crate::error::Error;
use crate::executor::ToolExecutor;
use crate::gateway::{CommandGateway, Envelope};
use crate::registry::DeviceRegistry;

/// Shared state for API handlers
pub struct ApiState {
    pub gateway: CommandGateway,
    pub registry: Arc<DeviceRegistry>,
    pub executor: Arc<dyn ToolExecutor>,
    pub config: Config,
}

impl ApiState {
    /// Wire up the registry and gateway around one executor
    #[must_use]
    pub fn new(executor: Arc<dyn ToolExecutor>, config: Config) -> Arc<Self> {
        let registry = Arc::new(DeviceRegistry::new(executor.clone()));
        let gateway = CommandGateway::new(executor.clone(), registry.clone(), config.clone());
        Arc::new(Self {
            gateway,
            registry,
            executor,
            config,
        })
    }
}

/// Gateway error with its HTTP status mapping
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidParameters(_) | Error::UnknownCommand(_) => StatusCode::BAD_REQUEST,
            Error::NoDevice => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !self.0.is_client_error() {
            tracing::error!(error = %self.0, "command dispatch failed");
        }
        (status, Json(Envelope::fail(self.0.to_string()))).into_response()
    }
}

/// Handler result: a success envelope or a mapped gateway error
pub type ApiResult = std::result::Result<Json<Envelope>, ApiError>;

/// Root endpoint with server information
async fn root(State(state): State<Arc<ApiState>>) -> Json<Envelope> {
    let devices: Vec<String> = state
        .registry
        .devices()
        .await
        .into_iter()
        .map(|d| d.id)
        .collect();

    Json(Envelope::ok(
        "Droid gateway is running",
        Some(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "supported_commands": COMMAND_NAMES,
            "connected_devices": devices,
        })),
    ))
}

/// Build the full router
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .with_state(state.clone())
        .merge(health::router(state.clone()))
        .merge(devices::router(state.clone()))
        .merge(input::router(state.clone()))
        .merge(mcp::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    host: String,
    port: u16,
    state: Arc<ApiState>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(host: String, port: u16, state: Arc<ApiState>) -> Self {
        Self { host, port, state }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or serve.
    pub async fn run(self) -> crate::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "API server listening");

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
