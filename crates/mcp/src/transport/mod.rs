mod sse;
mod stdio;
mod streamable_http;

use anyhow::Result;
use tokio::signal;

use crate::config::{ServerConfig, Transport};
use crate::server::McpServer;

pub use sse::router as sse_router;
pub use streamable_http::router as streamable_http_router;

/// Run the configured transport until its input closes or a shutdown signal arrives.
pub async fn serve(server: McpServer, config: &ServerConfig) -> Result<()> {
    match config.transport {
        Transport::Stdio => stdio::run(server).await,
        Transport::Sse => sse::run(server, config.addr).await,
        Transport::StreamableHttp => {
            streamable_http::run(server, config.addr, config.json_response).await
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
