//! Team balancer configuration

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for team balancing behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Largest roster the exhaustive splitter is applied to; larger rosters
    /// fall back to the greedy heuristic. C(12, 6) = 924 candidate splits.
    pub max_exhaustive_roster: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            max_exhaustive_roster: 12,
        }
    }
}

impl BalanceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_exhaustive_roster < 2 {
            return Err(CoreError::ConfigurationError {
                message: "max_exhaustive_roster must be at least 2".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BalanceConfig::default();
        assert_eq!(config.max_exhaustive_roster, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_too_small_ceiling_rejected() {
        let config = BalanceConfig {
            max_exhaustive_roster: 1,
        };
        assert!(config.validate().is_err());
    }
}
