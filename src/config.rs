//! # Runtime Configuration
//!
//! Environment-driven configuration for the coordination core. Defaults are
//! safe for development; production deployments override through `STEWARD_*`
//! environment variables.

use crate::constants;
use crate::error::{CoordinationError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a node-local coordinator runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StewardConfig {
    /// Identity of the local node, matched against ledger assignments
    pub node_id: String,
    /// Concurrent executions permitted per concurrency lane
    pub lane_width: usize,
    /// Capacity of the lifecycle notification broadcast channel
    pub notifier_channel_capacity: usize,
}

impl Default for StewardConfig {
    fn default() -> Self {
        Self {
            node_id: constants::DEFAULT_NODE_ID.to_string(),
            lane_width: constants::DEFAULT_LANE_WIDTH,
            notifier_channel_capacity: constants::DEFAULT_NOTIFIER_CAPACITY,
        }
    }
}

impl StewardConfig {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(node_id) = std::env::var(constants::env_vars::NODE_ID) {
            config.node_id = node_id;
        }

        if let Ok(lane_width) = std::env::var(constants::env_vars::LANE_WIDTH) {
            config.lane_width = lane_width.parse().map_err(|e| {
                CoordinationError::configuration("lane_width", format!("invalid value: {e}"))
            })?;
        }

        if let Ok(capacity) = std::env::var(constants::env_vars::NOTIFIER_CAPACITY) {
            config.notifier_channel_capacity = capacity.parse().map_err(|e| {
                CoordinationError::configuration(
                    "notifier_channel_capacity",
                    format!("invalid value: {e}"),
                )
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants
    pub fn validate(&self) -> Result<()> {
        if self.node_id.is_empty() {
            return Err(CoordinationError::configuration(
                "node_id",
                "must not be empty",
            ));
        }
        if self.lane_width == 0 {
            return Err(CoordinationError::configuration(
                "lane_width",
                "must be greater than zero",
            ));
        }
        if self.notifier_channel_capacity == 0 {
            return Err(CoordinationError::configuration(
                "notifier_channel_capacity",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StewardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.node_id, "local");
        assert_eq!(config.lane_width, 8);
    }

    #[test]
    fn test_validation_rejects_zero_lane_width() {
        let config = StewardConfig {
            lane_width: 0,
            ..StewardConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CoordinationError::Configuration { ref component, .. } if component == "lane_width"
        ));
    }

    #[test]
    fn test_validation_rejects_empty_node_id() {
        let config = StewardConfig {
            node_id: String::new(),
            ..StewardConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
