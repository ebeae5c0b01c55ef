//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pipeline;
mod send;
mod watch;

use anyhow::{Context, Result};
use clap::Subcommand;
use hive_client::HiveClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the live dashboard, reading operator commands from stdin
    Watch,
    /// Print every pipeline graph once
    Show,
    /// Print the inspector view of a pipeline or service
    Inspect {
        /// `<pipeline>` or `<pipeline>.<service>`
        target: String,
    },
    /// Send a command to a pipeline or service
    Send {
        /// `<pipeline>` or `<pipeline>.<service>`
        target: String,

        /// Command name (e.g. shutdown, suspend, resume)
        command: String,

        /// Free-text command arguments
        #[arg(short, long)]
        args: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the errors services have reported to the hive
    Errors,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = connect(config)?;

    match command {
        Commands::Watch => watch::run(client, config).await,
        Commands::Show => pipeline::show(&client).await,
        Commands::Inspect { target } => pipeline::inspect(client, config, &target).await,
        Commands::Send {
            target,
            command,
            args,
            yes,
        } => send::send(client, &target, &command, args, yes).await,
        Commands::Errors => pipeline::errors(&client).await,
    }
}

/// Builds the hive client with the configured request timeout
fn connect(config: &Config) -> Result<HiveClient> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    Ok(HiveClient::with_client(&config.hive_url, http))
}
