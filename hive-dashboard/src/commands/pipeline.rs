//! One-shot pipeline views

use anyhow::{Context, Result};
use colored::*;
use hive_client::HiveClient;
use hive_core::domain::target::Target;
use std::sync::Arc;

use crate::config::Config;
use crate::inspector::Inspector;
use crate::notify::TerminalNotifier;
use crate::render::{Renderer, TextLayout};
use crate::scheduler::reconcile;

/// Draws every pipeline with its current statuses
pub async fn show(client: &HiveClient) -> Result<()> {
    let snapshot = client
        .fetch_snapshot()
        .await
        .context("Failed to fetch pipelines")?;

    let mut renderer = Renderer::new(Box::new(TextLayout));
    if renderer.draw_all(&snapshot) == 0 {
        println!("{}", "No pipelines found.".yellow());
        return Ok(());
    }
    reconcile(&mut renderer, &snapshot, &TerminalNotifier);

    println!("{}", renderer.render());
    Ok(())
}

pub async fn inspect(client: HiveClient, config: &Config, target: &str) -> Result<()> {
    let target: Target = target
        .parse()
        .with_context(|| format!("Invalid target `{}`", target))?;

    let inspector = Inspector::new(Arc::new(client), Arc::new(TerminalNotifier), config);
    let session = inspector.open(target).await;

    println!("{}", session.view);
    Ok(())
}

pub async fn errors(client: &HiveClient) -> Result<()> {
    let report = client
        .fetch_error_report()
        .await
        .context("Failed to fetch error report")?;

    if report.is_empty() {
        println!("{}", "No errors reported.".green());
        return Ok(());
    }

    println!("{}", format!("Found {} error(s):", report.len()).bold());
    println!();
    for entry in report {
        println!("{}", entry.origin().cyan());
        println!("  {}", entry.text());
        if !entry.cause().is_empty() {
            println!("  {}", entry.cause().dimmed());
        }
    }
    Ok(())
}
