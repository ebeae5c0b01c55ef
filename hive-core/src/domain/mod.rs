//! Core domain types
//!
//! These types describe what the hive backend reports about its pipelines.
//! They are shared between the HTTP client (which decodes them) and the
//! dashboard (which renders them).

pub mod pipeline;
pub mod state;
pub mod target;
