//! Load testing CLI
//!
//! Runs the end-to-end scenarios from a terminal and inspects the resources
//! they create.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, ConnectionArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ltctl")]
#[command(about = "Cloud load testing end-to-end CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ltctl=info,loadtest_e2e=info,loadtest_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Values from a local .env feed the clap env fallbacks
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    let config = Config {
        connection: cli.connection,
        json: cli.json,
    };

    handle_command(cli.command, &config).await
}
