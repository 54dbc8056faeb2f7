//! Transport runners for the dealer MCP server.
//!
//! `serve_stdio` speaks MCP over the process's stdin and stdout.
//! `serve_streamable_http` mounts the streamable HTTP service at [`MCP_PATH`]
//! next to a plain-text `/health` probe.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use dealer_core::control::DealerControlPlane;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::DealerMcp;

pub const MCP_PATH: &str = "/mcp";
pub const DEFAULT_SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Settings for the streamable HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    /// Keep per-client sessions between requests.
    pub stateful_mode: bool,
    /// Interval of SSE keep-alive pings; `None` turns them off.
    pub sse_keep_alive: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(DEFAULT_SSE_KEEP_ALIVE),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }

    #[must_use]
    pub const fn with_sse_keep_alive(mut self, sse_keep_alive: Option<Duration>) -> Self {
        self.sse_keep_alive = sse_keep_alive;
        self
    }

    fn service_config(&self) -> StreamableHttpServerConfig {
        StreamableHttpServerConfig {
            sse_keep_alive: self.sse_keep_alive,
            stateful_mode: self.stateful_mode,
            ..Default::default()
        }
    }
}

/// Builds the HTTP router: `/health` plus the MCP service under [`MCP_PATH`].
///
/// Every MCP session gets its own `DealerMcp` over the shared control plane.
#[must_use]
pub fn streamable_http_router(control: DealerControlPlane, config: &McpHttpServerConfig) -> Router {
    let service: StreamableHttpService<DealerMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(DealerMcp::new(control.clone())),
            Arc::new(LocalSessionManager::default()),
            config.service_config(),
        );

    Router::new()
        .route("/health", get(health))
        .nest_service(MCP_PATH, service)
}

async fn health() -> &'static str {
    "ok"
}

/// Runs one MCP session over stdio until the client disconnects.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    control: DealerControlPlane,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("dealer-mcp serving on stdio");
    let running = serve_server(DealerMcp::new(control), stdio()).await?;
    let reason = running.waiting().await?;
    info!(?reason, "dealer-mcp stdio session ended");
    Ok(())
}

/// Serves MCP over streamable HTTP until shutdown.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    control: DealerControlPlane,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = streamable_http_router(control, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        path = MCP_PATH,
        stateful = config.stateful_mode,
        sse_keep_alive = ?config.sse_keep_alive,
        "dealer-mcp streamable HTTP listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use dealer_core::store::{DataStore, MemorySource};
    use tower::ServiceExt;

    fn addr() -> SocketAddr {
        "127.0.0.1:4020".parse().expect("valid addr")
    }

    #[test]
    fn service_config_follows_settings() {
        let config = McpHttpServerConfig::new(addr())
            .with_stateful_mode(false)
            .with_sse_keep_alive(None);

        let service = config.service_config();

        assert!(!service.stateful_mode);
        assert!(service.sse_keep_alive.is_none());
    }

    #[test]
    fn defaults_keep_sessions_and_pings() {
        let service = McpHttpServerConfig::new(addr()).service_config();

        assert!(service.stateful_mode);
        assert_eq!(service.sse_keep_alive, Some(DEFAULT_SSE_KEEP_ALIVE));
    }

    #[tokio::test]
    async fn router_answers_health() {
        let control = DealerControlPlane::new(DataStore::new(MemorySource::new()));
        let router = streamable_http_router(control, &McpHttpServerConfig::new(addr()));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        assert_eq!(&body[..], b"ok");
    }
}
