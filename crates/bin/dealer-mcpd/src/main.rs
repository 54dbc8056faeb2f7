//! Daemon entry point for the dealer MCP server.
//!
//! Loads configuration from the command line and environment, builds the
//! data store and tool registry, and runs every enabled transport: the HTTP
//! webhook, the MCP streamable HTTP server and MCP over stdio.

mod config;
mod logging;

use std::sync::Arc;

use dealer_core::control::DealerControlPlane;
use dealer_core::dispatch::{Dispatcher, dealer_registry};
use dealer_core::store::{CachedSource, DataStore, JsonDirSource};
use dealer_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use dealer_webhook::{WebhookServer, WebhookServerConfig};
use futures::future::{FutureExt, LocalBoxFuture, try_join_all};
use tracing::info;

use crate::config::DealerConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = DealerConfig::from_args()?;
    logging::init(config.log_format);

    let files = JsonDirSource::new(config.data_dir);
    info!(data_dir = %files.data_dir().display(), "reading dealership collections");
    let source = Arc::new(CachedSource::new(files, config.cache_ttl));
    let cache_ttl = source.ttl();
    let control = DealerControlPlane::new(DataStore::from_arc(source));
    let dispatcher = Arc::new(Dispatcher::new(dealer_registry(&control)?));
    info!(
        ?cache_ttl,
        tools = dispatcher.registry().len(),
        "dealer-mcpd starting"
    );

    let mut transports: Vec<LocalBoxFuture<'static, Result<(), BoxError>>> = Vec::new();
    if config.webhook_serve {
        let webhook_config = WebhookServerConfig::new(config.webhook_addr)
            .with_request_timeout(config.request_timeout);
        transports.push(WebhookServer::new(Arc::clone(&dispatcher), webhook_config).serve().boxed_local());
    }
    if config.mcp_serve {
        let mcp_config = McpHttpServerConfig::new(config.mcp_http_addr)
            .with_stateful_mode(config.mcp_stateful)
            .with_sse_keep_alive(config.mcp_sse_keep_alive);
        transports.push(serve_streamable_http(control.clone(), mcp_config).boxed_local());
    }
    if config.enable_stdio {
        transports.push(serve_stdio(control).boxed_local());
    }

    try_join_all(transports).await?;
    Ok(())
}
