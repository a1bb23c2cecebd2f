//! Starling Bank MCP server: configuration, logging, the MCP handler and both transports.

pub mod config;
pub mod http;
pub mod logging;
pub mod server;

use anyhow::Context as _;
use config::{Cli, Transport};
use rmcp::ServiceExt as _;
use server::StarlingMcpServer;
use starling_api::StarlingClient;
use starling_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the server from parsed flags and run the selected transport until shutdown.
///
/// # Errors
///
/// Fails on invalid configuration or if the transport cannot be started.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let api_config = cli.api_config().await?;
    let client = StarlingClient::new(api_config).context("build Starling client")?;

    if let starling_api::signing::SigningState::Invalid(reason) = client.signing() {
        warn!(%reason, "signing key could not be loaded; payment_create will fail");
    }

    let registry = ToolRegistry::new(client.clone()).context("build tool registry")?;
    info!(
        transport = ?cli.transport,
        base_url = %client.base_url(),
        signing = client.signing().is_ready(),
        tools = registry.len(),
        "starting starling-bank-mcp"
    );
    let server = StarlingMcpServer::new(Arc::new(registry));

    match cli.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => http::serve(server, &cli.bind_addr(), shutdown_signal()).await,
    }
}

async fn serve_stdio(server: StarlingMcpServer) -> anyhow::Result<()> {
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .context("start stdio transport")?;
    info!("Starling Bank MCP server running on stdio");

    let cancel = running.cancellation_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        cancel.cancel();
    });

    let reason = running.waiting().await.context("stdio service task")?;
    info!(?reason, "stdio transport stopped");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
