//! Streamable HTTP transport.
//!
//! `/mcp` runs rmcp's streamable HTTP service in stateless mode: no `Mcp-Session-Id`, no
//! `initialize` handshake required, every POST is served on its own. `/health` is a plain
//! liveness check for supervisors and tests.

use crate::server::StarlingMcpServer;
use anyhow::Context as _;
use axum::Router;
use axum::routing::get;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[must_use]
pub fn router(server: StarlingMcpServer, cancel: CancellationToken) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            cancellation_token: cancel,
            ..Default::default()
        },
    );

    Router::new()
        .route("/health", get(health))
        .route_service("/mcp", mcp)
}

async fn health() -> &'static str {
    "ok"
}

/// Bind and serve until `shutdown` resolves.
///
/// # Errors
///
/// Fails if the address cannot be bound or the server stops with an I/O error.
pub async fn serve(
    server: StarlingMcpServer,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local = listener.local_addr().context("read local address")?;

    let cancel = CancellationToken::new();
    let app = router(server, cancel.clone());

    info!("Starling Bank MCP server running on http://{local}/mcp");
    warn!("HTTP transport has no authentication. Only use behind a reverse proxy or in a secured setup.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            cancel.cancel();
        })
        .await
        .context("http server")?;

    info!("http server stopped");
    Ok(())
}
