use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use uisap_nav::config::NavConfig;
use uisap_nav::mcp::server::{McpContext, McpServer};
use uisap_nav::navigator::Navigator;

#[derive(Parser, Debug)]
#[command(name = "uisap-nav", version, about = "Go-to-definition server for uisap/core projects")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "uisap-nav.json")]
    config: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the MCP transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting uisap-nav...");

    // 1. Load config
    let config = NavConfig::load(&args.config)?;
    config.validate().context("invalid configuration")?;

    // 2. Init navigator
    let navigator = Navigator::new(config);

    // 3. Start Server
    let server = McpServer::new(McpContext { navigator });
    server.start().await?;

    Ok(())
}
