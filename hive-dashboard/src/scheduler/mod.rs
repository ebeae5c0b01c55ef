//! Scheduler layer for the dashboard
//!
//! This layer owns the poll timer and decides which snapshot responses are
//! allowed to touch the drawn graphs.

pub mod poller;

pub use poller::{PollOutcome, StatusPoller, reconcile};
