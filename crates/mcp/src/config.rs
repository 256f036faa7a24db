use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gaokao_core::{HeaderPool, MajorCatalog, MajorFetcher, OutputFormat};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use crate::tools::ToolRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Transport {
    #[default]
    Stdio,
    Sse,
    StreamableHttp,
}

#[derive(Debug, Parser)]
#[command(name = "gaokao-mcp")]
#[command(version)]
#[command(about = "MCP server for querying gaokao.cn major statistics")]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = Transport::Stdio, help = "Transport protocol")]
    pub transport: Transport,

    #[arg(
        long = "return_format",
        visible_alias = "return-format",
        default_value = "json",
        help = "Tool output format: json or markdown"
    )]
    pub return_format: OutputFormat,

    #[arg(long, default_value_t = 8000, help = "Port for sse / streamable-http")]
    pub port: u16,

    #[arg(
        long = "json_response",
        visible_alias = "json-response",
        help = "Answer streamable-http requests with JSON instead of SSE streams"
    )]
    pub json_response: bool,

    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST), help = "Address to bind")]
    pub host: IpAddr,

    #[arg(long, env = "GAOKAO_CATALOG", help = "Major catalog JSON [default: bundled sample catalog]")]
    pub catalog: Option<PathBuf>,

    #[arg(long, env = "GAOKAO_HEADERS", help = "Request header pool JSON [default: bundled]")]
    pub headers: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub return_format: OutputFormat,
    pub addr: SocketAddr,
    pub json_response: bool,
    pub catalog_path: Option<PathBuf>,
    pub headers_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            return_format: OutputFormat::Json,
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
            json_response: false,
            catalog_path: None,
            headers_path: None,
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            transport: cli.transport,
            return_format: cli.return_format,
            addr: SocketAddr::new(cli.host, cli.port),
            json_response: cli.json_response,
            catalog_path: cli.catalog,
            headers_path: cli.headers,
        }
    }
}

impl ServerConfig {
    pub fn load_catalog(&self) -> Result<MajorCatalog> {
        match &self.catalog_path {
            Some(path) => MajorCatalog::load(path)
                .with_context(|| format!("failed to load catalog from {}", path.display())),
            None => {
                tracing::warn!(
                    "using the bundled sample catalog; pass --catalog with the full major list for production"
                );
                MajorCatalog::embedded().context("failed to load bundled catalog")
            }
        }
    }

    pub fn load_headers(&self) -> Result<HeaderPool> {
        match &self.headers_path {
            Some(path) => HeaderPool::load(path)
                .with_context(|| format!("failed to load header pool from {}", path.display())),
            None => HeaderPool::embedded().context("failed to load bundled header pool"),
        }
    }

    /// Load the static datasets and build the shared tool registry.
    pub fn build_registry(&self) -> Result<ToolRegistry> {
        let catalog = self.load_catalog()?;
        let headers = self.load_headers()?;
        tracing::info!(
            majors = catalog.len(),
            header_sets = headers.len(),
            "reference data loaded"
        );

        let fetcher =
            MajorFetcher::new(Arc::new(headers)).context("failed to build HTTP client")?;
        Ok(ToolRegistry::new(
            Arc::new(catalog),
            fetcher,
            self.return_format,
        ))
    }
}
