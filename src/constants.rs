//! # System Constants
//!
//! Core constants that define the operational boundaries of the steward
//! coordination core.

/// Lane assigned to executors that do not declare one
pub const DEFAULT_LANE: &str = "default";

/// Default number of concurrent executions permitted per lane
pub const DEFAULT_LANE_WIDTH: usize = 8;

/// Default capacity of the lifecycle notification channel
pub const DEFAULT_NOTIFIER_CAPACITY: usize = 1000;

/// Node id used when the environment does not supply one
pub const DEFAULT_NODE_ID: &str = "local";

/// Environment variables consumed by [`crate::config::StewardConfig::from_env`]
pub mod env_vars {
    pub const NODE_ID: &str = "STEWARD_NODE_ID";
    pub const LANE_WIDTH: &str = "STEWARD_LANE_WIDTH";
    pub const NOTIFIER_CAPACITY: &str = "STEWARD_NOTIFIER_CAPACITY";
    pub const ENVIRONMENT: &str = "STEWARD_ENV";
}
