//! Engine configuration

use serde::{Deserialize, Serialize};

/// Access engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provision the instance-wide "Users" and "Viewers" default teams at startup
    #[serde(default = "default_true")]
    pub provision_instance_teams: bool,
    /// Log a warning when a selector edit leaves lower-precedence selectors shadowed
    #[serde(default = "default_true")]
    pub warn_shadowed_selectors: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provision_instance_teams: true,
            warn_shadowed_selectors: true,
        }
    }
}

impl EngineConfig {
    /// Merge engine configurations, preferring non-default values from `other`
    pub fn merge(mut self, other: Self) -> Self {
        if !other.provision_instance_teams {
            self.provision_instance_teams = false;
        }
        if !other.warn_shadowed_selectors {
            self.warn_shadowed_selectors = false;
        }
        self
    }
}

fn default_true() -> bool {
    true
}
