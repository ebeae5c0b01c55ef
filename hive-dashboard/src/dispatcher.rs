//! Command dispatcher
//!
//! Sends operator commands to a target and reports how they fared. Sending is
//! split in two halves so the dashboard loop can confirm and build a request
//! inline, deliver it from a background task, then report the outcome when it
//! comes back.

use async_trait::async_trait;
use hive_client::ClientError;
use hive_core::domain::target::Target;
use hive_core::dto::command::SendCommand;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::notify::{Notification, Notifier};

/// Commands every service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    Shutdown,
    Suspend,
    Resume,
}

impl BuiltinCommand {
    pub const ALL: [BuiltinCommand; 3] = [
        BuiltinCommand::Shutdown,
        BuiltinCommand::Suspend,
        BuiltinCommand::Resume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCommand::Shutdown => "shutdown",
            BuiltinCommand::Suspend => "suspend",
            BuiltinCommand::Resume => "resume",
        }
    }

    /// Shutting a service down cannot be undone from the dashboard
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, BuiltinCommand::Shutdown)
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// How a delivered command fared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The hive accepted the command
    Sent,
    /// The hive is up but cannot reach the message bus
    HiveDisconnect,
    /// The hive could not be reached, or refused the request
    Unreachable,
}

impl CommandOutcome {
    pub fn from_result(result: &hive_client::Result<()>) -> Self {
        match result {
            Ok(()) => CommandOutcome::Sent,
            Err(ClientError::HiveDisconnect(_)) => CommandOutcome::HiveDisconnect,
            Err(_) => CommandOutcome::Unreachable,
        }
    }

    pub fn notification(&self, command: &str) -> Notification {
        match self {
            CommandOutcome::Sent => Notification::command_sent(command),
            CommandOutcome::HiveDisconnect => Notification::hive_disconnect(),
            CommandOutcome::Unreachable => Notification::sending_failed(command),
        }
    }
}

/// Operator acknowledgment of a command before it is sent
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// Confirms everything, for `--yes`
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&mut self, prompt: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        if stdout.write_all(format!("{} [y/N] ", prompt).as_bytes()).await.is_err() {
            return false;
        }
        let _ = stdout.flush().await;

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(_) => is_affirmative(&line),
            Err(_) => false,
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn confirmation_prompt(command: &str) -> String {
    format!("Press OK to confirm {} command sending", command)
}

#[derive(Clone)]
pub struct CommandDispatcher {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
}

impl CommandDispatcher {
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Confirms (if needed) and builds the request
    ///
    /// Returns `None` when the operator declines; nothing is reported then.
    pub async fn prepare(
        &self,
        requires_confirmation: bool,
        command: &str,
        arguments: Option<String>,
        target: &Target,
        confirm: &mut dyn Confirm,
    ) -> Option<SendCommand> {
        if requires_confirmation && !confirm.confirm(&confirmation_prompt(command)).await {
            debug!("Operator declined `{}` for {}", command, target);
            return None;
        }
        Some(SendCommand::new(target, command, arguments))
    }

    /// Sends one request without reporting
    pub async fn deliver(&self, req: &SendCommand) -> CommandOutcome {
        let result = self.backend.send_command(req).await;
        if let Err(e) = &result {
            warn!("Command `{}` to {} failed: {}", req.command, req.target, e);
        }
        CommandOutcome::from_result(&result)
    }

    /// Tells the operator how a command fared
    pub fn report(&self, command: &str, outcome: CommandOutcome) {
        info!("Command `{}` finished: {:?}", command, outcome);
        self.notifier.notify(outcome.notification(command));
    }

    /// Confirms, sends and reports a command
    ///
    /// Returns `None` when nothing was sent.
    pub async fn send(
        &self,
        requires_confirmation: bool,
        command: &str,
        arguments: Option<String>,
        target: &Target,
        confirm: &mut dyn Confirm,
    ) -> Option<CommandOutcome> {
        let req = self
            .prepare(requires_confirmation, command, arguments, target, confirm)
            .await?;
        let outcome = self.deliver(&req).await;
        self.report(command, outcome);
        Some(outcome)
    }

    /// Builds a free-text command; a blank name builds nothing
    ///
    /// Custom commands are never confirmed.
    pub async fn prepare_custom(
        &self,
        name: &str,
        arguments: &str,
        target: &Target,
        confirm: &mut dyn Confirm,
    ) -> Option<SendCommand> {
        if name.is_empty() {
            debug!("Ignoring custom command without a name");
            return None;
        }
        self.prepare(false, name, Some(arguments.to_string()), target, confirm)
            .await
    }
}
