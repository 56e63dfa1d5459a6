use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use wasend_core::{InMemorySessionRegistry, Messenger};

mod commands;
mod config;
mod preview;

use config::ConfigLoader;
use preview::DryRunSession;

#[derive(Parser)]
#[command(name = "wasend", about = "Preview outbound WhatsApp messages")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: commands::send::SendCommand,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra config file layered over user and project config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Session id to send through
    #[arg(long, global = true)]
    session: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load(cli.config.as_deref())?;
    let session_id = cli.session.unwrap_or(config.cli.default_session);

    // The dry-run session is registered under whatever id was asked for.
    let registry = Arc::new(InMemorySessionRegistry::new());
    registry
        .insert(session_id.clone(), Arc::new(DryRunSession::new()))
        .await;
    debug!("Registered dry-run session {}", session_id);

    let messenger = Messenger::new(registry).with_config(config.messaging);
    commands::send::run(&messenger, &session_id, cli.command).await
}
