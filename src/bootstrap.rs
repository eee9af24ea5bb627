//! # Coordinator Bootstrap
//!
//! Wires configuration, notifier, dispatcher, executor registry and
//! coordinator into one runtime handle, so embedding applications construct
//! the whole node-side core in one call.

use std::sync::Arc;

use tracing::info;

use crate::config::StewardConfig;
use crate::coordinator::TaskCoordinator;
use crate::dispatch::LaneDispatcher;
use crate::error::Result;
use crate::ledger::{LedgerChange, LedgerSnapshot};
use crate::notifier::ChannelNotifier;
use crate::registry::{ExecutorRegistry, TaskExecutor};

/// Handle to a fully wired node-side coordination core
pub struct CoordinatorRuntime {
    config: StewardConfig,
    coordinator: Arc<TaskCoordinator>,
    notifier: Arc<ChannelNotifier>,
}

impl CoordinatorRuntime {
    /// Build the runtime from configuration and statically registered
    /// executors.
    ///
    /// Must be called within a tokio runtime context; execution dispatch
    /// spawns onto the current runtime.
    pub fn build(
        config: StewardConfig,
        executors: Vec<Arc<dyn TaskExecutor>>,
    ) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(ExecutorRegistry::new(executors)?);
        let notifier = Arc::new(ChannelNotifier::new(config.notifier_channel_capacity));
        let dispatcher = Arc::new(LaneDispatcher::new(config.lane_width));
        let coordinator = Arc::new(TaskCoordinator::new(
            registry.clone(),
            dispatcher,
            notifier.clone(),
        ));

        info!(
            node_id = %config.node_id,
            task_types = ?registry.task_types(),
            lane_width = config.lane_width,
            "Coordinator runtime built"
        );

        Ok(Self {
            config,
            coordinator,
            notifier,
        })
    }

    /// Build from `STEWARD_*` environment variables
    pub fn from_env(executors: Vec<Arc<dyn TaskExecutor>>) -> Result<Self> {
        Self::build(StewardConfig::from_env()?, executors)
    }

    /// The configured identity of this node
    pub fn node_id(&self) -> &str {
        &self.config.node_id
    }

    pub fn config(&self) -> &StewardConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &Arc<TaskCoordinator> {
        &self.coordinator
    }

    /// The notifier whose channel carries outbound lifecycle notices;
    /// transports subscribe here
    pub fn notifier(&self) -> &Arc<ChannelNotifier> {
        &self.notifier
    }

    /// Forward one ledger update to the coordinator, stamped with this
    /// node's configured identity
    pub fn on_ledger_changed(&self, previous: LedgerSnapshot, current: LedgerSnapshot) {
        let change = LedgerChange::new(previous, current, self.config.node_id.clone());
        self.coordinator.on_ledger_changed(&change);
    }
}
