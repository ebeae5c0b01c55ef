//! Data Transfer Objects for the hive HTTP contract
//!
//! Request and response bodies exchanged between the dashboard and the hive
//! backend. Field names match the wire format exactly.

pub mod command;
pub mod errors;
pub mod snapshot;
