//! One-shot command sending

use anyhow::{Context, Result, bail};
use hive_client::HiveClient;
use hive_core::domain::target::Target;
use std::sync::Arc;

use crate::dispatcher::{
    AssumeYes, BuiltinCommand, CommandDispatcher, CommandOutcome, Confirm, StdinConfirm,
};
use crate::notify::TerminalNotifier;

pub async fn send(
    client: HiveClient,
    target: &str,
    command: &str,
    args: Option<String>,
    yes: bool,
) -> Result<()> {
    let target: Target = target
        .parse()
        .with_context(|| format!("Invalid target `{}`", target))?;

    let requires_confirmation =
        BuiltinCommand::parse(command).is_some_and(|c| c.requires_confirmation());
    let mut confirm: Box<dyn Confirm> = if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    let dispatcher = CommandDispatcher::new(Arc::new(client), Arc::new(TerminalNotifier));
    let outcome = dispatcher
        .send(
            requires_confirmation,
            command,
            args,
            &target,
            confirm.as_mut(),
        )
        .await;

    match outcome {
        None => {
            println!("Aborted.");
            Ok(())
        }
        Some(CommandOutcome::Sent) => Ok(()),
        Some(outcome) => bail!("Command `{}` was not delivered ({:?})", command, outcome),
    }
}
