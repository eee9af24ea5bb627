//! The diff-and-act reconciliation engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::local_tasks::LocalTaskRegistry;
use crate::dispatch::TaskDispatcher;
use crate::ledger::{LedgerChange, TaskRecord};
use crate::notifier::LifecycleNotifier;
use crate::registry::{ExecutorRegistry, TaskContext};
use crate::task::AllocatedTask;

/// Per-node reconciliation engine for persistent tasks.
///
/// [`on_ledger_changed`](Self::on_ledger_changed) is driven by the
/// cluster-state subscription, one event at a time, on a single logical
/// delivery thread. Each pass is synchronous; only task execution itself is
/// dispatched asynchronously.
pub struct TaskCoordinator {
    executors: Arc<ExecutorRegistry>,
    dispatcher: Arc<dyn TaskDispatcher>,
    notifier: Arc<dyn LifecycleNotifier>,
    local_tasks: LocalTaskRegistry,
    local_id_seq: AtomicU64,
}

impl TaskCoordinator {
    pub fn new(
        executors: Arc<ExecutorRegistry>,
        dispatcher: Arc<dyn TaskDispatcher>,
        notifier: Arc<dyn LifecycleNotifier>,
    ) -> Self {
        Self {
            executors,
            dispatcher,
            notifier,
            local_tasks: LocalTaskRegistry::new(),
            local_id_seq: AtomicU64::new(0),
        }
    }

    /// The node-local registry of live tasks, for diagnostics and tests
    pub fn local_tasks(&self) -> &LocalTaskRegistry {
        &self.local_tasks
    }

    /// Reconcile the local node against a new ledger snapshot.
    ///
    /// Idempotent per (previous, current) pair: re-seeing an assignment that
    /// is already running is a no-op, and a task already `PENDING_CANCEL`
    /// is not re-cancelled.
    pub fn on_ledger_changed(&self, change: &LedgerChange) {
        let diff = change.diff();
        debug!(
            version = change.current.version(),
            node_id = %change.local_node_id,
            added = diff.added.len(),
            reassigned = diff.reassigned.len(),
            removed = diff.removed.len(),
            "Reconciling ledger snapshot"
        );

        let assigned_here = change.current.assigned_to(&change.local_node_id);

        // Start pass: assigned here, not yet running locally
        for record in assigned_here.values() {
            if !self.local_tasks.contains(&record.task_id) {
                self.start_task(record);
            }
        }

        // Cancel pass: running locally, no longer assigned here. Covers
        // reassignment elsewhere, removal from the ledger, and the defensive
        // case of a ledger that has no record of the task at all.
        for task in self.local_tasks.running() {
            if !assigned_here.contains_key(task.persistent_task_id()) {
                self.request_cancellation(&task);
            }
        }
    }

    /// Explicit external cancel request for a locally running task.
    ///
    /// Same transition and single cancellation request as a
    /// reassignment-away. Returns `true` if the task transitioned.
    pub fn cancel_local_task(&self, persistent_task_id: &str) -> bool {
        match self.local_tasks.get(persistent_task_id) {
            Some(task) => self.request_cancellation(&task),
            None => {
                debug!(persistent_task_id, "Cancel requested for task not running locally");
                false
            }
        }
    }

    fn start_task(&self, record: &TaskRecord) {
        let executor = match self.executors.lookup(&record.task_type) {
            Ok(executor) => executor,
            Err(error) => {
                // Configuration mismatch: skip this task, keep reconciling
                warn!(
                    persistent_task_id = %record.task_id,
                    task_type = %record.task_type,
                    %error,
                    "Cannot start persistent task, skipping"
                );
                return;
            }
        };

        let local_id = self.local_id_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let ctx = TaskContext::new(
            local_id,
            record.task_type.clone(),
            record.task_id.clone(),
            None,
            record.params.clone(),
            self.local_tasks.clone(),
            self.notifier.clone(),
        );

        let task = match executor.create_task(ctx) {
            Ok(task) => Arc::new(task),
            Err(error) => {
                warn!(
                    persistent_task_id = %record.task_id,
                    task_type = %record.task_type,
                    %error,
                    "Executor rejected persistent task, skipping"
                );
                return;
            }
        };

        if self.local_tasks.insert_if_absent(task.clone()) {
            info!(
                persistent_task_id = %record.task_id,
                task_type = %record.task_type,
                local_id,
                lane = executor.lane(),
                "Starting persistent task"
            );
            self.dispatcher
                .dispatch(record.params.clone(), task, executor);
        } else {
            // The previous instance has not finished yet; its terminal
            // callback clears the entry, and the next snapshot restarts us.
            debug!(
                persistent_task_id = %record.task_id,
                "Persistent task already live locally, dispatch suppressed"
            );
        }
    }

    fn request_cancellation(&self, task: &Arc<AllocatedTask>) -> bool {
        let transitioned = task.request_cancellation();
        if transitioned {
            info!(
                persistent_task_id = %task.persistent_task_id(),
                local_id = task.local_id(),
                "Persistent task no longer assigned here, requesting cancellation"
            );
            self.notifier.send_cancellation_request(task.local_id());
        }
        transitioned
    }
}

impl std::fmt::Debug for TaskCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskCoordinator")
            .field("registered_task_types", &self.executors.task_types())
            .field("live_tasks", &self.local_tasks.len())
            .finish()
    }
}
