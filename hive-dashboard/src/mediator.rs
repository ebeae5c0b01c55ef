//! Dashboard event mediator
//!
//! Every input the dashboard reacts to (operator lines, timer ticks, finished
//! background requests) becomes a [`DashboardEvent`] routed through
//! [`Dashboard::handle`]. The dashboard owns all mutable state, so the poll
//! loop, the inspector and the dispatcher never touch each other directly.

use async_trait::async_trait;
use hive_client::Snapshot;
use hive_core::domain::target::Target;
use hive_core::dto::command::SendCommand;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::config::Config;
use crate::dispatcher::{
    BuiltinCommand, CommandDispatcher, CommandOutcome, Confirm, is_affirmative,
};
use crate::inspector::{Inspector, InspectorSession};
use crate::notify::{Notification, Notifier};
use crate::render::{LayoutEngine, Renderer};
use crate::scheduler::{PollOutcome, StatusPoller, reconcile};

#[derive(Debug)]
pub enum DashboardEvent {
    /// Open the inspector for a target, replacing any open one
    OpenPopup(Target),
    ClosePopup,
    /// Operator clicked a pipeline section or one of its nodes
    Click {
        pipeline: String,
        service: Option<String>,
    },
    /// Send a command to the open inspector's target
    SendCommand {
        command: String,
        arguments: Option<String>,
        requires_confirmation: bool,
    },
    /// Send the free-text command fields
    SendCustomCommand { name: String, arguments: String },
    PollTick,
    SnapshotReceived {
        seq: u64,
        result: hive_client::Result<Snapshot>,
    },
    CommandFinished {
        command: String,
        outcome: CommandOutcome,
    },
    /// Tear down and redraw every graph
    Rebuild,
    Show,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Parses one line typed by the operator
///
/// Blank lines yield `Ok(None)`.
pub fn parse_operator_line(line: &str) -> Result<Option<DashboardEvent>, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let event = match verb {
        "" => return Ok(None),
        "open" => {
            let target = rest.parse::<Target>().map_err(|e| e.to_string())?;
            DashboardEvent::OpenPopup(target)
        }
        "click" => {
            let mut parts = rest.split_whitespace();
            let pipeline = parts
                .next()
                .ok_or_else(|| "usage: click <pipeline> [service]".to_string())?;
            DashboardEvent::Click {
                pipeline: pipeline.to_string(),
                service: parts.next().map(str::to_string),
            }
        }
        "close" => DashboardEvent::ClosePopup,
        "send" => {
            let (name, arguments) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            DashboardEvent::SendCustomCommand {
                name: name.to_string(),
                arguments: arguments.trim().to_string(),
            }
        }
        "reload" => DashboardEvent::Rebuild,
        "show" => DashboardEvent::Show,
        "quit" | "exit" => DashboardEvent::Quit,
        other => match BuiltinCommand::parse(other) {
            Some(builtin) => DashboardEvent::SendCommand {
                command: builtin.name().to_string(),
                arguments: None,
                requires_confirmation: builtin.requires_confirmation(),
            },
            None => return Err(format!("unknown command `{}`", other)),
        },
    };

    Ok(Some(event))
}

/// Lines typed by the operator
///
/// Also answers confirmation prompts, so a prompt simply waits for the next
/// line.
pub struct OperatorInput {
    lines: mpsc::Receiver<String>,
}

impl OperatorInput {
    pub fn new(lines: mpsc::Receiver<String>) -> Self {
        Self { lines }
    }

    /// Reads lines from stdin in a background task
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        Self::new(rx)
    }

    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }
}

#[async_trait]
impl Confirm for OperatorInput {
    async fn confirm(&mut self, prompt: &str) -> bool {
        println!("{} [y/N]", prompt);
        match self.next_line().await {
            Some(answer) => is_affirmative(&answer),
            None => false,
        }
    }
}

pub struct Dashboard {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    renderer: Renderer,
    poller: StatusPoller,
    inspector: Inspector,
    dispatcher: CommandDispatcher,
    session: Option<InspectorSession>,
    last_frame: String,
    events_tx: UnboundedSender<DashboardEvent>,
    events_rx: UnboundedReceiver<DashboardEvent>,
}

impl Dashboard {
    pub fn new(
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        layout: Box<dyn LayoutEngine>,
        config: &Config,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            inspector: Inspector::new(backend.clone(), notifier.clone(), config),
            dispatcher: CommandDispatcher::new(backend.clone(), notifier.clone()),
            backend,
            notifier,
            renderer: Renderer::new(layout),
            poller: StatusPoller::new(config.poll_interval),
            session: None,
            last_frame: String::new(),
            events_tx,
            events_rx,
        }
    }

    /// The open inspector, if any
    #[cfg(test)]
    pub fn session(&self) -> Option<&InspectorSession> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Runs until the operator quits or presses ctrl-c
    ///
    /// The first tick fires immediately, and its snapshot performs the
    /// initial draw.
    pub async fn run(self, input: OperatorInput) -> anyhow::Result<()> {
        self.run_until(input, tokio::signal::ctrl_c()).await
    }

    /// Runs until the operator quits or `shutdown` resolves with `Ok`
    ///
    /// If `shutdown` fails, only `quit` stops the loop.
    pub async fn run_until(
        mut self,
        mut input: OperatorInput,
        shutdown: impl Future<Output = std::io::Result<()>>,
    ) -> anyhow::Result<()> {
        info!("Dashboard started");
        let mut ticker = self.poller.ticker();
        let mut input_open = true;
        tokio::pin!(shutdown);
        let mut shutdown_armed = true;

        loop {
            let event = tokio::select! {
                _ = ticker.tick() => DashboardEvent::PollTick,
                Some(event) = self.events_rx.recv() => event,
                line = input.next_line(), if input_open => match line {
                    Some(line) => match parse_operator_line(&line) {
                        Ok(Some(event)) => event,
                        Ok(None) => continue,
                        Err(message) => {
                            println!("{}", message);
                            continue;
                        }
                    },
                    None => {
                        debug!("Operator input closed");
                        input_open = false;
                        continue;
                    }
                },
                signal = &mut shutdown, if shutdown_armed => match signal {
                    Ok(()) => DashboardEvent::Quit,
                    Err(e) => {
                        warn!("Cannot listen for shutdown signal: {}", e);
                        shutdown_armed = false;
                        continue;
                    }
                },
            };

            if self.handle(event, &mut input).await == Flow::Stop {
                break;
            }
        }

        info!("Dashboard stopped");
        Ok(())
    }

    /// Routes one event to the component that owns it
    pub async fn handle(&mut self, event: DashboardEvent, confirm: &mut dyn Confirm) -> Flow {
        match event {
            DashboardEvent::OpenPopup(target) => self.open(target).await,
            DashboardEvent::Click { pipeline, service } => {
                match self.renderer.click(&pipeline, service.as_deref()) {
                    Some(DashboardEvent::OpenPopup(target)) => self.open(target).await,
                    _ => println!("Nothing drawn at {}", pipeline),
                }
            }
            DashboardEvent::ClosePopup => {
                if let Some(session) = self.session.take() {
                    debug!("Closed inspector for {}", session.target);
                }
            }
            DashboardEvent::SendCommand {
                command,
                arguments,
                requires_confirmation,
            } => {
                if let Some(target) = self.current_target() {
                    let req = self
                        .dispatcher
                        .prepare(requires_confirmation, &command, arguments, &target, confirm)
                        .await;
                    if let Some(req) = req {
                        self.deliver_in_background(req);
                    }
                }
            }
            DashboardEvent::SendCustomCommand { name, arguments } => {
                if let Some(target) = self.current_target() {
                    let req = self
                        .dispatcher
                        .prepare_custom(&name, &arguments, &target, confirm)
                        .await;
                    if let Some(req) = req {
                        self.deliver_in_background(req);
                    }
                }
            }
            DashboardEvent::PollTick => {
                self.poller
                    .spawn_fetch(self.backend.clone(), self.events_tx.clone());
            }
            DashboardEvent::SnapshotReceived { seq, result } => {
                if self.renderer.is_empty() {
                    if let Ok(snapshot) = &result {
                        self.renderer.draw_all(snapshot);
                    }
                }
                let outcome = self.poller.handle_response(
                    seq,
                    result,
                    &mut self.renderer,
                    self.notifier.as_ref(),
                );
                if let PollOutcome::Applied(report) = outcome {
                    debug!(
                        "Snapshot #{} applied: {} updated, {} unrecognized",
                        seq, report.updated, report.unrecognized
                    );
                }
                self.refresh();
            }
            DashboardEvent::CommandFinished { command, outcome } => {
                self.dispatcher.report(&command, outcome);
            }
            DashboardEvent::Rebuild => self.rebuild().await,
            DashboardEvent::Show => {
                self.last_frame = self.renderer.render();
                println!("{}", self.last_frame);
            }
            DashboardEvent::Quit => return Flow::Stop,
        }
        Flow::Continue
    }

    async fn open(&mut self, target: Target) {
        let session = self.inspector.open(target).await;
        println!("{}", session.view);
        self.session = Some(session);
    }

    /// Target of the open inspector; commands have nowhere to go without one
    fn current_target(&self) -> Option<Target> {
        let target = self.session.as_ref().map(|s| s.target.clone());
        if target.is_none() {
            self.notifier.notify(Notification::no_target());
        }
        target
    }

    /// Delivers from a task; the outcome comes back as `CommandFinished`
    fn deliver_in_background(&self, req: SendCommand) {
        let dispatcher = self.dispatcher.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = dispatcher.deliver(&req).await;
            let _ = events.send(DashboardEvent::CommandFinished {
                command: req.command,
                outcome,
            });
        });
    }

    async fn rebuild(&mut self) {
        let seq = self.poller.issue();
        match self.backend.fetch_snapshot().await {
            Ok(snapshot) => {
                if self.poller.accept(seq) {
                    let changed = self.renderer.needs_rebuild(&snapshot);
                    let drawn = self.renderer.draw_all(&snapshot);
                    info!("Redrew {} pipeline(s) (topology changed: {})", drawn, changed);
                    reconcile(&mut self.renderer, &snapshot, self.notifier.as_ref());
                    self.refresh();
                }
            }
            Err(e) => {
                warn!("Rebuild failed: {}", e);
                self.notifier.notify(Notification::snapshot_failed(&e));
            }
        }
    }

    /// Prints the graphs if anything visible changed
    fn refresh(&mut self) {
        let frame = self.renderer.render();
        if frame != self.last_frame {
            println!("{}", frame);
            self.last_frame = frame;
        }
    }

    #[cfg(test)]
    async fn next_event(&mut self) -> Option<DashboardEvent> {
        self.events_rx.recv().await
    }
}
