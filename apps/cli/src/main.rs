//! # Stockroom CLI
//!
//! Command line client for the shop inventory backend.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize logging   RUST_LOG, default stockroom=info, stderr       │
//! │  3. Load configuration   file → STOCKROOM_* env → validate              │
//! │  4. Build the backend client (cookie session, timeouts)                 │
//! │  5. Run the subcommand                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod console;
mod context;

use anyhow::Context;
use clap::Parser;
use stockroom_client::StockroomConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = StockroomConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    debug!(base_url = %config.base_url(), "Configuration loaded");

    let ctx = AppContext::new(config, cli.email.clone())?;
    info!(version = env!("CARGO_PKG_VERSION"), "Stockroom CLI starting");

    commands::run(cli.command, &ctx, cli.config).await
}

/// Logs go to stderr so tables on stdout stay clean.
///
/// - `RUST_LOG=debug` - everything at debug
/// - `RUST_LOG=stockroom_billing=trace` - one crate only
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,stockroom=info,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
