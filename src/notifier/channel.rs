//! Broadcast-channel notifier for in-process transports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use super::{LifecycleNotifier, TaskOutcome};
use crate::constants;

/// One outbound lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleNotice {
    CancellationRequested {
        local_task_id: u64,
        requested_at: DateTime<Utc>,
    },
    TaskFinished {
        persistent_task_id: String,
        outcome: TaskOutcome,
        finished_at: DateTime<Utc>,
    },
}

/// Lifecycle notifier backed by a tokio broadcast channel.
///
/// The transport that talks to the ledger owner subscribes and drains
/// notices at its own pace. Publishing with no subscribers is acceptable -
/// notifications are best-effort and the reconciliation loop self-corrects.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: broadcast::Sender<LifecycleNotice>,
}

impl ChannelNotifier {
    /// Create a notifier with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to outbound notices
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleNotice> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, notice: LifecycleNotice) {
        // send() errors only when there are no subscribers; that is fine
        if self.sender.send(notice).is_err() {
            debug!("No lifecycle subscribers, notice dropped");
        }
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new(constants::DEFAULT_NOTIFIER_CAPACITY)
    }
}

impl LifecycleNotifier for ChannelNotifier {
    fn send_cancellation_request(&self, local_task_id: u64) {
        debug!(local_task_id, "Sending cancellation request");
        self.publish(LifecycleNotice::CancellationRequested {
            local_task_id,
            requested_at: Utc::now(),
        });
    }

    fn send_completion_notification(&self, persistent_task_id: &str, outcome: TaskOutcome) {
        debug!(
            persistent_task_id,
            outcome = %outcome,
            "Sending completion notification"
        );
        self.publish(LifecycleNotice::TaskFinished {
            persistent_task_id: persistent_task_id.to_string(),
            outcome,
            finished_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_accepted() {
        let notifier = ChannelNotifier::new(16);
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.send_cancellation_request(42);
    }

    #[test]
    fn test_subscribers_receive_notices() {
        let notifier = ChannelNotifier::new(16);
        let mut rx = notifier.subscribe();

        notifier.send_cancellation_request(42);
        notifier.send_completion_notification("task-1", TaskOutcome::Completed);

        match rx.try_recv().unwrap() {
            LifecycleNotice::CancellationRequested { local_task_id, .. } => {
                assert_eq!(local_task_id, 42);
            }
            other => panic!("unexpected notice: {other:?}"),
        }
        match rx.try_recv().unwrap() {
            LifecycleNotice::TaskFinished {
                persistent_task_id,
                outcome,
                ..
            } => {
                assert_eq!(persistent_task_id, "task-1");
                assert_eq!(outcome, TaskOutcome::Completed);
            }
            other => panic!("unexpected notice: {other:?}"),
        }
    }
}
