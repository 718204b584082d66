use affiliate_cli::{cli, commands};
use affiliate_shared::logging;
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output, so logs go to stderr. Override level via
    // RUST_LOG if needed.
    let _guard = logging::init_tracing("info", None, "affiliate-cli", std::io::stderr)?;

    let cli = cli::Cli::parse();
    commands::run(cli).await
}
