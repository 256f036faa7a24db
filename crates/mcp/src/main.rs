use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gaokao_mcp::{transport, Cli, McpServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the stdio transport; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gaokao_mcp=info,gaokao_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ServerConfig::from(cli);
    tracing::info!(
        transport = ?config.transport,
        return_format = %config.return_format,
        "starting gaokao-mcp"
    );

    let registry = Arc::new(config.build_registry()?);
    let server = McpServer::new(registry);

    transport::serve(server, &config).await
}
