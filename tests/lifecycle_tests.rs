//! Terminal-transition semantics: unconditional cleanup, best-effort
//! notification, and exactly-once delivery of outcomes.

mod common;

use common::{add_task, TestHarness, LOCAL_NODE};
use serde_json::json;
use steward_core::ledger::LedgerSnapshot;
use steward_core::notifier::{LifecycleNotice, TaskOutcome};
use steward_core::task::TaskState;

#[test]
fn test_terminal_cleanup_without_any_subscriber() {
    // No subscriber on the lifecycle channel: the notification send has
    // nowhere to go, yet local bookkeeping cleanup still happens.
    let harness = TestHarness::with_task_types(&["test-action"]);
    assert_eq!(harness.notifier.subscriber_count(), 0);

    let state = LedgerSnapshot::empty();
    let (current, _) = add_task(&state, "test-action", json!({}), LOCAL_NODE);
    harness.deliver(&state, &current);

    harness.dispatcher.task(0).mark_as_completed();
    assert!(harness.coordinator.local_tasks().is_empty());
}

#[test]
fn test_completion_notification_payload() {
    let harness = TestHarness::with_task_types(&["test-action"]);
    let mut notices = harness.notifier.subscribe();

    let state = LedgerSnapshot::empty();
    let (current, task_id) = add_task(&state, "test-action", json!({}), LOCAL_NODE);
    harness.deliver(&state, &current);

    harness.dispatcher.task(0).mark_as_completed();

    match notices.try_recv().unwrap() {
        LifecycleNotice::TaskFinished {
            persistent_task_id,
            outcome,
            ..
        } => {
            assert_eq!(persistent_task_id, task_id);
            assert_eq!(outcome, TaskOutcome::Completed);
        }
        other => panic!("unexpected notice: {other:?}"),
    }
}

#[test]
fn test_second_terminal_call_does_not_double_notify() {
    let harness = TestHarness::with_task_types(&["test-action"]);
    let mut notices = harness.notifier.subscribe();

    let state = LedgerSnapshot::empty();
    let (current, _) = add_task(&state, "test-action", json!({}), LOCAL_NODE);
    harness.deliver(&state, &current);

    let task = harness.dispatcher.task(0);
    task.mark_as_completed();
    task.mark_as_failed("late failure after completion");

    assert_eq!(task.state(), TaskState::Completed);
    assert!(matches!(
        notices.try_recv().unwrap(),
        LifecycleNotice::TaskFinished { .. }
    ));
    assert!(notices.try_recv().is_err(), "exactly one notification");
}

#[test]
fn test_status_reflects_each_lifecycle_stage() {
    let harness = TestHarness::with_task_types(&["test-action"]);

    let state = LedgerSnapshot::empty();
    let (current, task_id) = add_task(&state, "test-action", json!({}), LOCAL_NODE);
    harness.deliver(&state, &current);

    let statuses = harness.coordinator.local_tasks().statuses();
    assert_eq!(statuses[&task_id].to_string(), "{\"state\":\"STARTED\"}");

    harness.coordinator.cancel_local_task(&task_id);
    let statuses = harness.coordinator.local_tasks().statuses();
    assert_eq!(
        statuses[&task_id].to_string(),
        "{\"state\":\"PENDING_CANCEL\"}"
    );

    harness.dispatcher.task(0).mark_as_failed("stopped");
    assert!(harness.coordinator.local_tasks().statuses().is_empty());
}
