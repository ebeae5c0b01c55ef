//! Status poller
//!
//! Re-fetches the hive snapshot on a fixed interval and re-applies status
//! classes to graphs that are already drawn. Fetches run in their own tasks
//! and come back as [`DashboardEvent::SnapshotReceived`]; each carries the
//! sequence number it was issued with, and responses older than the newest
//! applied one are dropped.

use hive_client::{Result as ClientResult, Snapshot};
use hive_core::status::{StatusError, classify};
use hive_core::topology::compile_pipeline;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, Duration, Interval, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::backend::Backend;
use crate::mediator::DashboardEvent;
use crate::notify::{Notification, Notifier};
use crate::render::Renderer;

/// What happened to one snapshot response
#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Applied(ReconcileReport),
    /// A newer response was already applied
    Stale,
    /// The fetch failed; nothing was touched
    Failed,
}

/// Summary of one status reconciliation
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Nodes whose status class was (re)applied
    pub updated: usize,
    /// Nodes left as they were because their status is not recognized
    pub unrecognized: usize,
    /// Pipelines whose topology no longer matches the drawn graph
    pub drifted: Vec<String>,
}

/// Issues sequenced snapshot fetches and filters their responses
pub struct StatusPoller {
    interval: Duration,
    issued: u64,
    applied: u64,
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            issued: 0,
            applied: 0,
        }
    }

    /// Timer driving the poll loop
    ///
    /// A late tick is not made up for with a burst of fetches.
    pub fn ticker(&self) -> Interval {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Reserves the next sequence number
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Records `seq` as applied unless something newer already was
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }

    /// Starts a fetch whose result is delivered on `events`
    pub fn spawn_fetch(
        &mut self,
        backend: Arc<dyn Backend>,
        events: UnboundedSender<DashboardEvent>,
    ) -> u64 {
        let seq = self.issue();
        debug!("Polling snapshot #{}", seq);

        tokio::spawn(async move {
            let result = backend.fetch_snapshot().await;
            // The receiver only goes away when the dashboard shuts down
            let _ = events.send(DashboardEvent::SnapshotReceived { seq, result });
        });

        seq
    }

    /// Applies one fetch result to the drawn graphs
    ///
    /// Every failure produces exactly one warning; the graphs keep their last
    /// known classes.
    pub fn handle_response(
        &mut self,
        seq: u64,
        result: ClientResult<Snapshot>,
        renderer: &mut Renderer,
        notifier: &dyn Notifier,
    ) -> PollOutcome {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Poll #{} failed: {}", seq, e);
                notifier.notify(Notification::snapshot_failed(&e));
                return PollOutcome::Failed;
            }
        };

        if !self.accept(seq) {
            debug!(
                "Discarding stale snapshot #{} (latest applied #{})",
                seq, self.applied
            );
            return PollOutcome::Stale;
        }

        PollOutcome::Applied(reconcile(renderer, &snapshot, notifier))
    }
}

/// Re-applies the snapshot's statuses to every drawn pipeline
///
/// Pipelines are handled one at a time, in draw order. Services whose status
/// is not recognized are reported and keep their current class.
pub fn reconcile(
    renderer: &mut Renderer,
    snapshot: &Snapshot,
    notifier: &dyn Notifier,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for (name, _) in snapshot.info.iter().filter(|(name, _)| renderer.get(name).is_none()) {
        debug!("Pipeline {} is not drawn; ignoring", name);
        report.drifted.push(name.to_string());
    }

    for handle in renderer.graphs_mut() {
        let pipeline = handle.pipeline().to_string();

        match snapshot.pipeline(&pipeline) {
            Some(info) if &compile_pipeline(info) == handle.graph() => {}
            _ => report.drifted.push(pipeline.clone()),
        }

        let Some(states) = snapshot.pipeline_states(&pipeline) else {
            warn!("Snapshot has no state for pipeline {}", pipeline);
            continue;
        };

        let mut statuses = BTreeMap::new();
        for node in handle.nodes() {
            let Some(state) = states.get(&node.name) else {
                warn!("Snapshot has no state for {}.{}", pipeline, node.name);
                continue;
            };
            match classify(state) {
                Ok(status) => {
                    statuses.insert(node.name.clone(), status);
                }
                Err(StatusError::Unrecognized { value }) => {
                    error!(
                        "Service {}.{} reported unrecognized status `{}`",
                        pipeline, node.name, value
                    );
                    notifier.notify(Notification::unrecognized_status(&pipeline, &node.name, &value));
                    report.unrecognized += 1;
                }
            }
        }

        report.updated += handle.apply_statuses(&statuses);
    }

    if !report.drifted.is_empty() {
        warn!(
            "Topology changed for {}; run `reload` to redraw",
            report.drifted.join(", ")
        );
    }

    report
}
