//! Command DTOs

use serde::{Deserialize, Serialize};

use crate::domain::target::Target;

/// Body of `POST /send_command`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCommand {
    /// `pipeline` or `pipeline.service`
    pub target: String,

    pub command: String,

    /// Free text; the hive splits it into one argument per line
    pub command_arguments: Option<String>,
}

impl SendCommand {
    pub fn new(target: &Target, command: impl Into<String>, arguments: Option<String>) -> Self {
        Self {
            target: target.wire(),
            command: command.into(),
            command_arguments: arguments,
        }
    }
}
