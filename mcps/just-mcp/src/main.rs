//! just MCP Server
//!
//! Exposes the recipes of a justfile as three MCP tools: `list`, `show` and `run`.
//!
//! # Usage
//!
//! Run directly: `just-mcp [--config <path>] [--just <path>] [--timeout-ms <n>]`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "just": { "command": "./just-mcp" } } }
//! ```

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};

use just_mcp::{init_tracing, Cli, JustMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;

    tracing::info!("Starting just MCP Server");

    let server = JustMcpServer::with_config(cli.into_config()?)?;

    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
