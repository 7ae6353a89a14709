//! Draft protocol configuration: candidate map pool and turn script

use crate::draft::script::TurnScript;
use crate::error::{CoreError, Result};
use crate::types::MapId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default competitive map pool
pub const DEFAULT_MAP_POOL: [&str; 7] = [
    "inferno", "mirage", "dust2", "nuke", "overpass", "ancient", "anubis",
];

/// Configuration for draft sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftConfig {
    /// Fixed ordered pool of candidate maps, the universe for every session
    pub map_pool: Vec<MapId>,
    /// Fixed alternating sequence of (team, action) turns
    pub script: TurnScript,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            map_pool: DEFAULT_MAP_POOL.iter().map(|m| m.to_string()).collect(),
            script: TurnScript::standard(),
        }
    }
}

impl DraftConfig {
    /// Validate pool and script compatibility.
    ///
    /// The turn script removes one map per step, so the pool must hold at
    /// least one more candidate than the script has steps; anything smaller
    /// would create a session that is resolved before its first turn.
    pub fn validate(&self) -> Result<()> {
        if self.map_pool.len() < 2 {
            return Err(CoreError::ConfigurationError {
                message: format!(
                    "Map pool must contain at least 2 maps, got {}",
                    self.map_pool.len()
                ),
            }
            .into());
        }

        let unique: HashSet<&MapId> = self.map_pool.iter().collect();
        if unique.len() != self.map_pool.len() {
            return Err(CoreError::ConfigurationError {
                message: "Map pool contains duplicate maps".to_string(),
            }
            .into());
        }

        if self.script.is_empty() {
            return Err(CoreError::ConfigurationError {
                message: "Turn script must contain at least one step".to_string(),
            }
            .into());
        }

        if self.map_pool.len() <= self.script.len() {
            return Err(CoreError::ConfigurationError {
                message: format!(
                    "Map pool of {} maps cannot support a {}-step script",
                    self.map_pool.len(),
                    self.script.len()
                ),
            }
            .into());
        }

        Ok(())
    }
}
