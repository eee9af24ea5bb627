//! The executor seam and the immutable task-type lookup table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::constants;
use crate::coordinator::LocalTaskRegistry;
use crate::error::{CoordinationError, Result};
use crate::notifier::LifecycleNotifier;
use crate::task::AllocatedTask;

/// Everything an executor factory needs to build one task instance.
///
/// Constructed by the coordinator; executors receive it in
/// [`TaskExecutor::create_task`] and usually just forward it to
/// [`AllocatedTask::new`] after validating `params`.
pub struct TaskContext {
    pub local_id: u64,
    pub task_type: String,
    pub persistent_task_id: String,
    pub parent_task_id: Option<String>,
    pub params: Value,
    pub(crate) registry: LocalTaskRegistry,
    pub(crate) notifier: Arc<dyn LifecycleNotifier>,
}

impl TaskContext {
    pub(crate) fn new(
        local_id: u64,
        task_type: impl Into<String>,
        persistent_task_id: impl Into<String>,
        parent_task_id: Option<String>,
        params: Value,
        registry: LocalTaskRegistry,
        notifier: Arc<dyn LifecycleNotifier>,
    ) -> Self {
        Self {
            local_id,
            task_type: task_type.into(),
            persistent_task_id: persistent_task_id.into(),
            parent_task_id,
            params,
            registry,
            notifier,
        }
    }
}

/// Pluggable logic that knows how to run one task type.
///
/// Implementations are externally supplied, arbitrary-duration workloads.
/// The body is expected to observe [`AllocatedTask::is_cancelled`] and call
/// `mark_as_completed` / `mark_as_failed` exactly once when done - this core
/// never forcibly interrupts a running task.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Task-type name this executor handles; matches ledger records
    fn task_type(&self) -> &str;

    /// Logical concurrency lane this type's tasks run on
    fn lane(&self) -> &str {
        constants::DEFAULT_LANE
    }

    /// Factory hook: build the local task handle.
    ///
    /// The default builds a plain [`AllocatedTask`]; override to validate
    /// params or attach type-specific setup before execution is dispatched.
    fn create_task(&self, ctx: TaskContext) -> Result<AllocatedTask> {
        Ok(AllocatedTask::new(ctx))
    }

    /// Run the task body. Dispatched asynchronously on this executor's lane;
    /// the coordinator never waits for it.
    async fn execute(&self, params: Value, task: Arc<AllocatedTask>);
}

/// Immutable task-type to executor lookup table, built once at startup
pub struct ExecutorRegistry {
    executors: HashMap<String, Arc<dyn TaskExecutor>>,
}

impl ExecutorRegistry {
    /// Build the registry from statically configured executors.
    ///
    /// Two executors claiming the same task type is a configuration error.
    pub fn new(executors: impl IntoIterator<Item = Arc<dyn TaskExecutor>>) -> Result<Self> {
        let mut table: HashMap<String, Arc<dyn TaskExecutor>> = HashMap::new();
        for executor in executors {
            let task_type = executor.task_type().to_string();
            if table.insert(task_type.clone(), executor).is_some() {
                return Err(CoordinationError::configuration(
                    "executor_registry",
                    format!("duplicate executor for task type: {task_type}"),
                ));
            }
            debug!(task_type = %task_type, "Registered task executor");
        }
        Ok(Self { executors: table })
    }

    /// Look up the executor for a task type
    pub fn lookup(&self, task_type: &str) -> Result<Arc<dyn TaskExecutor>> {
        self.executors
            .get(task_type)
            .cloned()
            .ok_or_else(|| CoordinationError::unknown_task_type(task_type))
    }

    /// All registered task types, sorted for stable diagnostics output
    pub fn task_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.executors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}
