//! Shared fixtures for coordinator integration tests.
#![allow(dead_code)] // each test binary uses a different subset

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use steward_core::coordinator::TaskCoordinator;
use steward_core::dispatch::TaskDispatcher;
use steward_core::ledger::{Assignment, LedgerChange, LedgerSnapshot};
use steward_core::notifier::ChannelNotifier;
use steward_core::registry::{ExecutorRegistry, TaskExecutor};
use steward_core::task::AllocatedTask;

pub const LOCAL_NODE: &str = "this_node";

/// One captured dispatch request
pub struct Execution {
    pub params: Value,
    pub task: Arc<AllocatedTask>,
}

/// Dispatcher that records executions instead of running them, so tests can
/// observe exactly what the coordinator requested and drive task bodies by
/// hand.
#[derive(Default)]
pub struct RecordingDispatcher {
    executions: Mutex<Vec<Execution>>,
}

impl RecordingDispatcher {
    pub fn len(&self) -> usize {
        self.executions.lock().unwrap().len()
    }

    pub fn task(&self, index: usize) -> Arc<AllocatedTask> {
        self.executions.lock().unwrap()[index].task.clone()
    }

    pub fn params(&self, index: usize) -> Value {
        self.executions.lock().unwrap()[index].params.clone()
    }

    pub fn clear(&self) {
        self.executions.lock().unwrap().clear();
    }

    /// Dispatch counts per persistent task id
    pub fn counts_by_id(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for execution in self.executions.lock().unwrap().iter() {
            *counts
                .entry(execution.task.persistent_task_id().to_string())
                .or_insert(0) += 1;
        }
        counts
    }
}

impl TaskDispatcher for RecordingDispatcher {
    fn dispatch(
        &self,
        params: Value,
        task: Arc<AllocatedTask>,
        _executor: Arc<dyn TaskExecutor>,
    ) {
        self.executions.lock().unwrap().push(Execution { params, task });
    }
}

/// Executor whose body is never driven directly; the recording dispatcher
/// intercepts execution.
pub struct TestExecutor {
    task_type: &'static str,
}

impl TestExecutor {
    pub fn new(task_type: &'static str) -> Arc<Self> {
        Arc::new(Self { task_type })
    }
}

#[async_trait]
impl TaskExecutor for TestExecutor {
    fn task_type(&self) -> &str {
        self.task_type
    }

    fn lane(&self) -> &str {
        "test-lane"
    }

    async fn execute(&self, _params: Value, _task: Arc<AllocatedTask>) {
        unreachable!("recording dispatcher never runs task bodies");
    }
}

/// A coordinator wired to recording collaborators
pub struct TestHarness {
    pub coordinator: TaskCoordinator,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub notifier: Arc<ChannelNotifier>,
}

impl TestHarness {
    pub fn with_task_types(task_types: &[&'static str]) -> Self {
        let executors = task_types
            .iter()
            .map(|task_type| TestExecutor::new(task_type) as Arc<dyn TaskExecutor>)
            .collect::<Vec<_>>();
        let registry = Arc::new(ExecutorRegistry::new(executors).unwrap());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let notifier = Arc::new(ChannelNotifier::new(64));
        let coordinator = TaskCoordinator::new(registry, dispatcher.clone(), notifier.clone());
        Self {
            coordinator,
            dispatcher,
            notifier,
        }
    }

    /// Deliver a ledger transition to the coordinator
    pub fn deliver(&self, previous: &LedgerSnapshot, current: &LedgerSnapshot) {
        self.coordinator.on_ledger_changed(&LedgerChange::new(
            previous.clone(),
            current.clone(),
            LOCAL_NODE,
        ));
    }
}

/// Add a task with a generated id, returning the next snapshot and the id
pub fn add_task(
    snapshot: &LedgerSnapshot,
    task_type: &str,
    params: Value,
    node: &str,
) -> (LedgerSnapshot, String) {
    let task_id = Uuid::new_v4().to_string();
    let next = snapshot
        .add_task(
            &task_id,
            task_type,
            params,
            Assignment::to_node(node, "test assignment"),
        )
        .unwrap();
    (next, task_id)
}

pub fn reallocate_task(snapshot: &LedgerSnapshot, task_id: &str, node: &str) -> LedgerSnapshot {
    assert!(snapshot.has_task(task_id));
    snapshot
        .reassign_task(task_id, Assignment::to_node(node, "test assignment"))
        .unwrap()
}

pub fn remove_task(snapshot: &LedgerSnapshot, task_id: &str) -> LedgerSnapshot {
    assert!(snapshot.has_task(task_id));
    snapshot.remove_task(task_id).unwrap()
}
