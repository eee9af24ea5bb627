use std::fmt;

use serde::{Deserialize, Serialize};

/// Status states of a locally allocated persistent task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Normal execution; cancellable
    Started,
    /// Cancellation requested, execution not yet confirmed stopped
    PendingCancel,
    /// Task body reported success
    Completed,
    /// Task body reported failure
    Failed,
}

impl TaskState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Check if cancellation may still be requested from this state
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Started)
    }
}

impl Default for TaskState {
    fn default() -> Self {
        Self::Started
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "STARTED"),
            Self::PendingCancel => write!(f, "PENDING_CANCEL"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTED" => Ok(Self::Started),
            "PENDING_CANCEL" => Ok(Self::PendingCancel),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Invalid task state: {s}")),
        }
    }
}

/// Externally observable status record for diagnostics.
///
/// Serializes to the wire shape consumers expect, e.g.
/// `{"state":"PENDING_CANCEL"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self { state }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"state\":\"{}\"}}", self.state)
    }
}
