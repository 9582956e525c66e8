//! Response body returned by the `run` endpoint.

use serde::{Deserialize, Serialize};

/// Outcome of one synthesized command execution.
///
/// Created fresh per request and discarded once rendered. `cmd` is always
/// serialized; the remaining fields are omitted when empty, except `stdout`
/// which is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    /// Process exit code, only populated on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Captured stdout lines in arrival order
    #[serde(default)]
    pub stdout: Vec<String>,
    /// Captured stderr lines in arrival order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stderr: Vec<String>,
    /// Error description when launch or execution failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The exact synthesized command line
    pub cmd: String,
}

impl RunResponse {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            ..Default::default()
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
