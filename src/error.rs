//! # Coordination Error Types
//!
//! Structured error handling for the coordination core using thiserror
//! instead of `Box<dyn Error>` patterns.
//!
//! Nothing here is fatal to the process: every failure is per-task and
//! isolated. A task body reporting failure is *not* an error in this
//! taxonomy; it is a normal terminal outcome carried by
//! [`crate::notifier::TaskOutcome`].

use thiserror::Error;

/// Coordination error types
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Ledger operation on an unknown task id. Caller bug, surfaced
    /// immediately, never retried.
    #[error("persistent task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Ledger ids are never reused; re-adding one is a caller bug.
    #[error("persistent task already exists: {task_id}")]
    DuplicateTask { task_id: String },

    /// No executor registered for a task type present in the ledger.
    /// Configuration mismatch: the task is skipped and logged, and
    /// reconciliation continues for other tasks.
    #[error("no executor registered for task type: {task_type}")]
    UnknownTaskType { task_type: String },

    #[error("configuration error: {component}: {message}")]
    Configuration { component: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoordinationError {
    /// Create a task-not-found error
    pub fn task_not_found(task_id: impl Into<String>) -> Self {
        Self::TaskNotFound {
            task_id: task_id.into(),
        }
    }

    /// Create a duplicate-task error
    pub fn duplicate_task(task_id: impl Into<String>) -> Self {
        Self::DuplicateTask {
            task_id: task_id.into(),
        }
    }

    /// Create an unknown-task-type error
    pub fn unknown_task_type(task_type: impl Into<String>) -> Self {
        Self::UnknownTaskType {
            task_type: task_type.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            component: component.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoordinationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoordinationError::task_not_found("abc123");
        assert_eq!(err.to_string(), "persistent task not found: abc123");

        let err = CoordinationError::unknown_task_type("reindex");
        assert_eq!(
            err.to_string(),
            "no executor registered for task type: reindex"
        );

        let err = CoordinationError::configuration("lane_width", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "configuration error: lane_width: must be greater than zero"
        );
    }
}
