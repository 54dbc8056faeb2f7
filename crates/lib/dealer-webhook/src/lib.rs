//! HTTP webhook transport for dealer-mcp.
//!
//! Exposes the tool dispatcher over the webhook routes used by hosted MCP
//! runtimes: `GET` lists tools, `POST .../tools/list` lists tools and
//! `POST .../tools/call` runs one.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use dealer_core::dispatch::{
    CallToolResponse,
    DispatchError,
    DispatchErrorKind,
    Dispatcher,
    ToolListing,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

pub const SERVICE_NAME: &str = "dealer-mcp";
pub const WEBHOOK_ROOT: &str = "/runtime/webhooks/mcp";

/// Configuration for the webhook HTTP server.
#[derive(Debug, Clone)]
pub struct WebhookServerConfig {
    pub addr: SocketAddr,
    pub request_timeout: Duration,
}

impl WebhookServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// HTTP webhook server wrapper.
pub struct WebhookServer {
    config: WebhookServerConfig,
    state: AppState,
}

impl WebhookServer {
    #[must_use]
    pub const fn new(dispatcher: Arc<Dispatcher>, config: WebhookServerConfig) -> Self {
        let state = AppState {
            dispatcher,
            request_timeout: config.request_timeout,
        };
        Self { config, state }
    }

    /// Runs the HTTP server until shutdown.
    ///
    /// # Errors
    /// Returns any listener or server error.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let app = build_router(self.state);

        info!("dealer-webhook listening on {addr}{WEBHOOK_ROOT}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
    request_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

impl HealthResponse {
    const fn healthy() -> Self {
        Self {
            status: "healthy",
            service: SERVICE_NAME,
        }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn timeout() -> Self {
        Self {
            status: StatusCode::REQUEST_TIMEOUT,
            message: "tool call timed out".to_string(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err.kind() {
            DispatchErrorKind::BadRequest => Self::bad_request(err.to_string()),
            DispatchErrorKind::NotFound => Self::not_found(err.to_string()),
            DispatchErrorKind::Internal => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse { error: self.message });
        (self.status, payload).into_response()
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(WEBHOOK_ROOT, get(list_tools))
        .route(
            &format!("{WEBHOOK_ROOT}/*path"),
            get(list_tools).post(webhook_post),
        )
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

async fn list_tools(State(state): State<AppState>) -> Json<ToolListing> {
    Json(state.dispatcher.list())
}

async fn webhook_post(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    match path.trim_matches('/') {
        "tools/list" => Ok(Json(state.dispatcher.list()).into_response()),
        "tools/call" => {
            let envelope = parse_envelope(&body)?;
            let response = call_tool(&state, envelope).await?;
            Ok(Json(response).into_response())
        }
        "health" => Ok(Json(HealthResponse::healthy()).into_response()),
        other => {
            debug!(path = other, "unknown webhook endpoint");
            Err(ApiError::not_found("Unknown endpoint"))
        }
    }
}

fn parse_envelope(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "rejecting malformed webhook body");
        ApiError::bad_request(format!("invalid JSON body: {err}"))
    })
}

async fn call_tool(state: &AppState, envelope: Value) -> Result<CallToolResponse, ApiError> {
    let dispatcher = Arc::clone(&state.dispatcher);
    let task = tokio::task::spawn_blocking(move || dispatcher.call(&envelope));
    let joined = tokio::time::timeout(state.request_timeout, task)
        .await
        .map_err(|_| {
            warn!(timeout = ?state.request_timeout, "tool call timed out");
            ApiError::timeout()
        })?;
    let outcome = joined.map_err(|err| {
        error!(error = %err, "tool call task failed");
        ApiError::internal("tool call failed")
    })?;
    outcome.map_err(ApiError::from)
}
