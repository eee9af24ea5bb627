//! The node-local registry of live allocated tasks.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::task::{AllocatedTask, TaskStatus};

/// Live allocated tasks on this node, keyed by persistent task id.
///
/// Backed by a sharded concurrent map: inserts and removals are single-entry
/// operations, so per-shard locking suffices and unrelated task lifecycles
/// never serialize against each other. At most one live task exists per
/// persistent task id; the entry discipline in
/// [`insert_if_absent`](Self::insert_if_absent) enforces it.
#[derive(Clone, Default)]
pub struct LocalTaskRegistry {
    tasks: Arc<DashMap<String, Arc<AllocatedTask>>>,
}

impl LocalTaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task unless one is already live for its persistent id.
    ///
    /// Returns `true` when the task was inserted. The occupied case covers
    /// the race window where a task id is cancelled and reassigned back here
    /// before the original instance's terminal callback fires: no second
    /// instance may exist until the entry is cleared.
    pub fn insert_if_absent(&self, task: Arc<AllocatedTask>) -> bool {
        match self.tasks.entry(task.persistent_task_id().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(task);
                true
            }
        }
    }

    pub fn get(&self, persistent_task_id: &str) -> Option<Arc<AllocatedTask>> {
        self.tasks
            .get(persistent_task_id)
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, persistent_task_id: &str) -> bool {
        self.tasks.contains_key(persistent_task_id)
    }

    /// Remove the entry for `persistent_task_id`, but only if it still holds
    /// the instance identified by `local_id`.
    pub(crate) fn remove_instance(
        &self,
        persistent_task_id: &str,
        local_id: u64,
    ) -> Option<Arc<AllocatedTask>> {
        self.tasks
            .remove_if(persistent_task_id, |_, task| task.local_id() == local_id)
            .map(|(_, task)| task)
    }

    /// Snapshot of all currently live tasks
    pub fn running(&self) -> Vec<Arc<AllocatedTask>> {
        self.tasks.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Observable status per live task, for diagnostics
    pub fn statuses(&self) -> HashMap<String, TaskStatus> {
        self.tasks
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().status()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl std::fmt::Debug for LocalTaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTaskRegistry")
            .field("live_tasks", &self.len())
            .finish()
    }
}
