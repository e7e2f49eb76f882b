//! Noctisium MCP Server
//!
//! Exposes the weekly KPI ranking to AI agents over stdio. Tools cover:
//! - Checking rank status and tiers
//! - Assessing weeks and previewing progress
//! - Reading and regenerating the rank history

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::NoctisiumServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Noctisium MCP server");

    let server = NoctisiumServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    service.waiting().await?;

    Ok(())
}
