//! Ledger change events delivered to the coordinator.

use super::snapshot::{LedgerDiff, LedgerSnapshot};

/// One ledger update as delivered by the cluster-state subscription.
///
/// Events arrive in order; a slow consumer may receive the latest snapshot
/// and skip intermediate ones. The coordinator reconciles current-vs-running,
/// never transition history, so skipped snapshots are harmless.
#[derive(Debug, Clone)]
pub struct LedgerChange {
    pub previous: LedgerSnapshot,
    pub current: LedgerSnapshot,
    /// Identity of the node this event was delivered to
    pub local_node_id: String,
}

impl LedgerChange {
    pub fn new(
        previous: LedgerSnapshot,
        current: LedgerSnapshot,
        local_node_id: impl Into<String>,
    ) -> Self {
        Self {
            previous,
            current,
            local_node_id: local_node_id.into(),
        }
    }

    /// Which task ids changed in this update
    pub fn diff(&self) -> LedgerDiff {
        self.current.diff(&self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Assignment;
    use serde_json::json;

    #[test]
    fn test_change_diff() {
        let previous = LedgerSnapshot::empty();
        let current = previous
            .add_task(
                "task-1",
                "indexer",
                json!({}),
                Assignment::to_node("node-a", "test assignment"),
            )
            .unwrap();

        let change = LedgerChange::new(previous, current, "node-a");
        assert_eq!(change.diff().added, vec!["task-1".to_string()]);
        assert_eq!(change.local_node_id, "node-a");
    }
}
