//! Live dashboard

use anyhow::Result;
use colored::*;
use hive_client::HiveClient;
use std::sync::Arc;

use crate::config::Config;
use crate::mediator::{Dashboard, OperatorInput};
use crate::notify::TerminalNotifier;
use crate::render::TextLayout;

pub async fn run(client: HiveClient, config: &Config) -> Result<()> {
    println!(
        "{} {}",
        "Watching".green().bold(),
        config.hive_url.cyan()
    );
    println!(
        "{}",
        "Commands: open <target>, click <pipeline> [service], close, send <command> [args], \
         shutdown, suspend, resume, reload, show, quit"
            .dimmed()
    );

    let dashboard = Dashboard::new(
        Arc::new(client),
        Arc::new(TerminalNotifier),
        Box::new(TextLayout),
        config,
    );
    dashboard.run(OperatorInput::stdin()).await
}
