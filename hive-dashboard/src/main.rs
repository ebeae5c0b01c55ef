//! Hive Dashboard
//!
//! Terminal dashboard for the hive's pipelines: draws each pipeline's service
//! graph, keeps node statuses live, and relays operator commands.

mod backend;
mod commands;
mod config;
mod dispatcher;
mod inspector;
mod mediator;
mod notify;
mod render;
mod scheduler;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hive-dashboard")]
#[command(about = "Hive pipeline dashboard", long_about = None)]
struct Cli {
    /// Hive URL
    #[arg(long, env = "HIVE_URL", default_value = "http://localhost:8090")]
    hive_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the dashboard
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hive_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.hive_url);
    config.validate()?;

    tracing::debug!("Using hive at {}", config.hive_url);

    handle_command(cli.command, &config).await
}
