//! Error report DTOs

use serde::{Deserialize, Serialize};

/// One entry of `GET /errors?type=json`
///
/// Delivered as a `[origin, text, cause]` array, newest first. The origin
/// reads `pipeline:service`, suffixed with ` at <timestamp>` when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry(pub String, pub String, pub String);

impl ErrorEntry {
    pub fn origin(&self) -> &str {
        &self.0
    }

    pub fn text(&self) -> &str {
        &self.1
    }

    pub fn cause(&self) -> &str {
        &self.2
    }
}
