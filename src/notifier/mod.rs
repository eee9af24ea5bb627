//! # Lifecycle Notifier
//!
//! The boundary through which local task outcomes travel back to the
//! cluster-wide ledger owner: cancellation acknowledgments and
//! completion/failure notifications.
//!
//! ## Overview
//!
//! Both calls are fire-and-forget from the coordinator's perspective. Their
//! asynchronous delivery never blocks reconciliation and is never retried by
//! this core; the reconciliation loop is self-correcting on the next
//! snapshot, so a lost notification is resolved by the ledger owner
//! re-driving state. A cancellation ack never changes local task state -
//! only the task body's own terminal call does.

pub mod channel;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use channel::{ChannelNotifier, LifecycleNotice};

/// Terminal outcome of a locally executed persistent task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    Failed { error: String },
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// Outbound lifecycle notification boundary.
///
/// Implementations enqueue and return immediately; delivery, transport and
/// any retry policy belong to the embedding system.
pub trait LifecycleNotifier: Send + Sync {
    /// Ask the ledger owner to acknowledge cancellation of a local task.
    ///
    /// Carries the node-local task id; the remote side resolves it through
    /// its own bookkeeping.
    fn send_cancellation_request(&self, local_task_id: u64);

    /// Report a terminal outcome for a persistent task
    fn send_completion_notification(&self, persistent_task_id: &str, outcome: TaskOutcome);
}
