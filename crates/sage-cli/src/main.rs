//! Sage CLI - plan and execute a research goal

use anyhow::Result;
use clap::Parser as _;
use sage_cli::cli::Cli;
use sage_cli::handlers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    handlers::handle_run(cli).await
}
