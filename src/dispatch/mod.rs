//! # Execution Dispatch
//!
//! Hands freshly registered tasks to their executors without blocking the
//! reconciliation pass.
//!
//! ## Overview
//!
//! The [`TaskDispatcher`] seam separates "decide what runs" from "run it":
//! the coordinator calls [`dispatch`](TaskDispatcher::dispatch) and returns
//! immediately; tests substitute a recording dispatcher to observe exactly
//! which executions were requested. The production implementation,
//! [`LaneDispatcher`], spawns each task body on the tokio runtime and bounds
//! concurrent executions per named lane with a semaphore.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::constants;
use crate::registry::TaskExecutor;
use crate::task::AllocatedTask;

/// Asynchronous execution dispatch seam
pub trait TaskDispatcher: Send + Sync {
    /// Begin executing a task body on the executor's designated lane.
    ///
    /// Must not block: the coordinator invokes this from the ledger delivery
    /// thread.
    fn dispatch(&self, params: Value, task: Arc<AllocatedTask>, executor: Arc<dyn TaskExecutor>);
}

/// Tokio-backed dispatcher with per-lane concurrency bounds.
///
/// A lane is a named concurrency group: each holds `lane_width` permits, and
/// a dispatched task owns one permit for its entire (possibly very long)
/// execution. Lanes are created lazily on first use.
pub struct LaneDispatcher {
    handle: tokio::runtime::Handle,
    lanes: DashMap<String, Arc<Semaphore>>,
    lane_width: usize,
}

impl LaneDispatcher {
    /// Create a dispatcher on the current tokio runtime.
    ///
    /// Panics outside a runtime context; use
    /// [`with_handle`](Self::with_handle) when constructing elsewhere.
    pub fn new(lane_width: usize) -> Self {
        Self::with_handle(tokio::runtime::Handle::current(), lane_width)
    }

    pub fn with_handle(handle: tokio::runtime::Handle, lane_width: usize) -> Self {
        Self {
            handle,
            lanes: DashMap::new(),
            lane_width: lane_width.max(1),
        }
    }

    fn lane_semaphore(&self, lane: &str) -> Arc<Semaphore> {
        self.lanes
            .entry(lane.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.lane_width)))
            .clone()
    }

    /// Number of executions a lane can still admit right now
    pub fn available_permits(&self, lane: &str) -> usize {
        self.lanes
            .get(lane)
            .map_or(self.lane_width, |sem| sem.available_permits())
    }
}

impl Default for LaneDispatcher {
    fn default() -> Self {
        Self::new(constants::DEFAULT_LANE_WIDTH)
    }
}

impl TaskDispatcher for LaneDispatcher {
    fn dispatch(&self, params: Value, task: Arc<AllocatedTask>, executor: Arc<dyn TaskExecutor>) {
        let lane = executor.lane().to_string();
        let semaphore = self.lane_semaphore(&lane);

        debug!(
            persistent_task_id = %task.persistent_task_id(),
            local_id = task.local_id(),
            %lane,
            "Dispatching persistent task execution"
        );

        self.handle.spawn(async move {
            let permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // Semaphore closed only happens on teardown
                    warn!(
                        persistent_task_id = %task.persistent_task_id(),
                        %lane,
                        "Lane closed, dropping execution"
                    );
                    return;
                }
            };
            executor.execute(params, task).await;
            drop(permit);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::LocalTaskRegistry;
    use crate::notifier::ChannelNotifier;
    use crate::registry::TaskContext;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingExecutor {
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TaskExecutor for CountingExecutor {
        fn task_type(&self) -> &str {
            "counting"
        }

        fn lane(&self) -> &str {
            "counting-lane"
        }

        async fn execute(&self, _params: Value, task: Arc<AllocatedTask>) {
            self.runs.fetch_add(1, Ordering::SeqCst);
            task.mark_as_completed();
        }
    }

    fn make_task(registry: &LocalTaskRegistry) -> Arc<AllocatedTask> {
        let task = Arc::new(AllocatedTask::new(TaskContext::new(
            1,
            "counting",
            "task-1",
            None,
            serde_json::json!({}),
            registry.clone(),
            Arc::new(ChannelNotifier::default()),
        )));
        assert!(registry.insert_if_absent(task.clone()));
        task
    }

    #[tokio::test]
    async fn test_dispatch_runs_executor_on_lane() {
        let dispatcher = LaneDispatcher::new(2);
        let runs = Arc::new(AtomicUsize::new(0));
        let executor = Arc::new(CountingExecutor { runs: runs.clone() });
        let registry = LocalTaskRegistry::new();
        let task = make_task(&registry);

        dispatcher.dispatch(serde_json::json!({}), task, executor);

        // The body runs asynchronously; wait until it finishes and its lane
        // permit is returned
        for _ in 0..100 {
            if dispatcher.available_permits("counting-lane") == 2
                && runs.load(Ordering::SeqCst) == 1
            {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty(), "terminal transition clears the registry");
        assert_eq!(dispatcher.available_permits("counting-lane"), 2);
    }
}
