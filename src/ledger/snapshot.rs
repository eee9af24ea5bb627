//! Immutable ledger snapshots and the pure operations that edit them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoordinationError, Result};

/// Target node for a persistent task, plus a human-readable explanation.
///
/// `node: None` means no node can currently take the task (for example, no
/// capacity anywhere); the explanation is diagnostic only and never feeds
/// back into reconciliation decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub node: Option<String>,
    pub explanation: String,
}

impl Assignment {
    /// Assign to a specific node
    pub fn to_node(node: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            node: Some(node.into()),
            explanation: explanation.into(),
        }
    }

    /// No node can currently take this task
    pub fn none(explanation: impl Into<String>) -> Self {
        Self {
            node: None,
            explanation: explanation.into(),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.node.is_some()
    }

    /// Check whether this assignment targets the given node
    pub fn is_assigned_to(&self, node_id: &str) -> bool {
        self.node.as_deref() == Some(node_id)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "{} ({})", node, self.explanation),
            None => write!(f, "unassigned ({})", self.explanation),
        }
    }
}

/// One persistent task as recorded in the ledger.
///
/// `params` is an opaque, type-tagged payload: the coordinator never
/// interprets it, it only hands it to the executor registered for
/// `task_type`. Params are immutable once created for a given id, so
/// snapshot diffing compares task type and assignment only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub task_type: String,
    pub params: Value,
    pub assignment: Assignment,
}

/// Which task ids changed between two snapshots, by id-by-id comparison of
/// task type + assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerDiff {
    pub added: Vec<String>,
    pub reassigned: Vec<String>,
    pub removed: Vec<String>,
}

impl LedgerDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.reassigned.is_empty() && self.removed.is_empty()
    }
}

/// An immutable, versioned snapshot of all persistent tasks cluster-wide.
///
/// All edit operations are pure: snapshot in, snapshot out, version bumped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    version: u64,
    tasks: HashMap<String, TaskRecord>,
}

impl LedgerSnapshot {
    /// The empty ledger, version 0
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_task(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskRecord> {
        self.tasks.get(task_id)
    }

    /// Iterate all task records in no particular order
    pub fn tasks(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.values()
    }

    /// All records whose assignment targets the given node, keyed by task id
    pub fn assigned_to(&self, node_id: &str) -> HashMap<&str, &TaskRecord> {
        self.tasks
            .values()
            .filter(|record| record.assignment.is_assigned_to(node_id))
            .map(|record| (record.task_id.as_str(), record))
            .collect()
    }

    /// Add a new task, producing the next snapshot.
    ///
    /// Ids are never reused, so re-adding an existing id is a caller bug
    /// and fails with [`CoordinationError::DuplicateTask`].
    pub fn add_task(
        &self,
        task_id: impl Into<String>,
        task_type: impl Into<String>,
        params: Value,
        assignment: Assignment,
    ) -> Result<Self> {
        let task_id = task_id.into();
        if self.tasks.contains_key(&task_id) {
            return Err(CoordinationError::duplicate_task(task_id));
        }

        let mut tasks = self.tasks.clone();
        tasks.insert(
            task_id.clone(),
            TaskRecord {
                task_id,
                task_type: task_type.into(),
                params,
                assignment,
            },
        );
        Ok(self.next(tasks))
    }

    /// Move an existing task to a new assignment, producing the next snapshot
    pub fn reassign_task(&self, task_id: &str, assignment: Assignment) -> Result<Self> {
        if !self.tasks.contains_key(task_id) {
            return Err(CoordinationError::task_not_found(task_id));
        }

        let mut tasks = self.tasks.clone();
        if let Some(record) = tasks.get_mut(task_id) {
            record.assignment = assignment;
        }
        Ok(self.next(tasks))
    }

    /// Remove an existing task, producing the next snapshot
    pub fn remove_task(&self, task_id: &str) -> Result<Self> {
        if !self.tasks.contains_key(task_id) {
            return Err(CoordinationError::task_not_found(task_id));
        }

        let mut tasks = self.tasks.clone();
        tasks.remove(task_id);
        Ok(self.next(tasks))
    }

    /// Compute which task ids changed since `previous`.
    ///
    /// Comparison is id-by-id over task type + assignment; params are
    /// immutable per id and do not participate.
    pub fn diff(&self, previous: &LedgerSnapshot) -> LedgerDiff {
        let mut diff = LedgerDiff::default();

        for (task_id, record) in &self.tasks {
            match previous.tasks.get(task_id) {
                None => diff.added.push(task_id.clone()),
                Some(prior)
                    if prior.task_type != record.task_type
                        || prior.assignment != record.assignment =>
                {
                    diff.reassigned.push(task_id.clone());
                }
                Some(_) => {}
            }
        }
        for task_id in previous.tasks.keys() {
            if !self.tasks.contains_key(task_id) {
                diff.removed.push(task_id.clone());
            }
        }

        diff
    }

    /// Whether two snapshots carry the same assignments for every task id
    pub fn same_assignments(&self, other: &LedgerSnapshot) -> bool {
        self.diff(other).is_empty()
    }

    fn next(&self, tasks: HashMap<String, TaskRecord>) -> Self {
        Self {
            version: self.version + 1,
            tasks,
        }
    }
}
