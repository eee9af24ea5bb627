//! The local runtime handle for one executing persistent task instance.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::states::{TaskState, TaskStatus};
use crate::coordinator::LocalTaskRegistry;
use crate::notifier::{LifecycleNotifier, TaskOutcome};
use crate::registry::TaskContext;

/// One locally executing persistent task.
///
/// The status cell is shared between two actors: the coordinator (marks
/// `PENDING_CANCEL`) and the executing task body (terminal transitions via
/// [`mark_as_completed`](Self::mark_as_completed) /
/// [`mark_as_failed`](Self::mark_as_failed)). Terminal transitions happen
/// exactly once; a repeated call is a warn-level no-op and never
/// double-notifies.
pub struct AllocatedTask {
    local_id: u64,
    persistent_task_id: String,
    task_type: String,
    parent_task_id: Option<String>,
    state: Mutex<TaskState>,
    cancelled: AtomicBool,
    registry: LocalTaskRegistry,
    notifier: Arc<dyn LifecycleNotifier>,
}

impl AllocatedTask {
    /// Create a task handle from the context supplied by the coordinator
    pub fn new(ctx: TaskContext) -> Self {
        Self {
            local_id: ctx.local_id,
            persistent_task_id: ctx.persistent_task_id,
            task_type: ctx.task_type,
            parent_task_id: ctx.parent_task_id,
            state: Mutex::new(TaskState::Started),
            cancelled: AtomicBool::new(false),
            registry: ctx.registry,
            notifier: ctx.notifier,
        }
    }

    /// Node-local task id; cancellation requests carry this id
    pub fn local_id(&self) -> u64 {
        self.local_id
    }

    /// Cluster-wide persistent task id; matches the ledger key
    pub fn persistent_task_id(&self) -> &str {
        &self.persistent_task_id
    }

    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    pub fn parent_task_id(&self) -> Option<&str> {
        self.parent_task_id.as_deref()
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock()
    }

    /// Externally observable status record for diagnostics
    pub fn status(&self) -> TaskStatus {
        TaskStatus::new(self.state())
    }

    /// Whether cancellation has been requested.
    ///
    /// Cancellation is cooperative: task bodies are expected to observe this
    /// flag and call their terminal transition. Nothing forcibly interrupts
    /// a running task.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Flip `STARTED` into `PENDING_CANCEL` and raise the cancellation flag.
    ///
    /// Returns `true` only when the transition happened, so the caller sends
    /// at most one cancellation request per task instance no matter how many
    /// times a snapshot without this task is redelivered.
    pub(crate) fn request_cancellation(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_cancellable() {
            return false;
        }
        *state = TaskState::PendingCancel;
        self.cancelled.store(true, Ordering::SeqCst);
        true
    }

    /// Report successful completion from the task body
    pub fn mark_as_completed(&self) {
        self.finish(TaskOutcome::Completed);
    }

    /// Report failure from the task body
    pub fn mark_as_failed(&self, error: impl Into<String>) {
        self.finish(TaskOutcome::Failed {
            error: error.into(),
        });
    }

    fn finish(&self, outcome: TaskOutcome) {
        {
            let mut state = self.state.lock();
            if state.is_terminal() {
                warn!(
                    persistent_task_id = %self.persistent_task_id,
                    local_id = self.local_id,
                    state = %state,
                    "Terminal transition repeated, ignoring"
                );
                return;
            }
            *state = match outcome {
                TaskOutcome::Completed => TaskState::Completed,
                TaskOutcome::Failed { .. } => TaskState::Failed,
            };
        }

        // Local bookkeeping cleanup is unconditional; the remote
        // notification below is best-effort.
        self.registry
            .remove_instance(&self.persistent_task_id, self.local_id);

        debug!(
            persistent_task_id = %self.persistent_task_id,
            local_id = self.local_id,
            outcome = %outcome,
            "Persistent task finished locally"
        );

        self.notifier
            .send_completion_notification(&self.persistent_task_id, outcome);
    }
}

impl fmt::Debug for AllocatedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocatedTask")
            .field("local_id", &self.local_id)
            .field("persistent_task_id", &self.persistent_task_id)
            .field("task_type", &self.task_type)
            .field("state", &self.state())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
