//! Status classifier
//!
//! Maps a service state record onto exactly one member of [`Status`]. A value
//! outside the closed set means the hive and the dashboard disagree on the
//! contract, so it is an error and never a default.

use std::str::FromStr;
use thiserror::Error;

use crate::domain::state::{ServiceState, Status};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("unrecognized service status `{value}` (expected one of: up, down, suspended)")]
    Unrecognized { value: String },
}

impl FromStr for Status {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::Unrecognized {
                value: s.to_string(),
            })
    }
}

/// Classifies a service state, taking its status verbatim
pub fn classify(state: &ServiceState) -> Result<Status, StatusError> {
    state.pipeline_state.parse()
}
