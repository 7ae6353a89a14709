//! Main core configuration
//!
//! This module defines the primary configuration structures for the scrim-room
//! coordination core, including environment variable loading and validation.

use crate::config::balance::BalanceConfig;
use crate::config::draft::DraftConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Main core configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    pub service: ServiceSettings,
    pub room: RoomSettings,
    pub balance: BalanceConfig,
    pub draft: DraftConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Room lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSettings {
    /// Maximum number of players a room accepts
    pub capacity: usize,
    /// Smallest roster that can be marked ready and balanced
    pub min_ready_players: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "scrim-room".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            capacity: 10,
            min_ready_players: 2,
        }
    }
}

impl CoreConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Room settings
        if let Ok(capacity) = env::var("ROOM_CAPACITY") {
            config.room.capacity = capacity
                .parse()
                .map_err(|_| anyhow!("Invalid ROOM_CAPACITY value: {}", capacity))?;
        }
        if let Ok(min_ready) = env::var("MIN_READY_PLAYERS") {
            config.room.min_ready_players = min_ready
                .parse()
                .map_err(|_| anyhow!("Invalid MIN_READY_PLAYERS value: {}", min_ready))?;
        }

        // Balance settings
        if let Ok(ceiling) = env::var("MAX_EXHAUSTIVE_ROSTER") {
            config.balance.max_exhaustive_roster = ceiling
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_EXHAUSTIVE_ROSTER value: {}", ceiling))?;
        }

        // Draft settings: comma-separated map pool override
        if let Ok(pool) = env::var("MAP_POOL") {
            config.draft.map_pool = pool
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &CoreConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    // Validate room settings
    if config.room.min_ready_players < 2 {
        return Err(anyhow!("Minimum ready players must be at least 2"));
    }
    if config.room.capacity < config.room.min_ready_players {
        return Err(anyhow!(
            "Room capacity {} is below the minimum ready roster {}",
            config.room.capacity,
            config.room.min_ready_players
        ));
    }

    config.balance.validate()?;
    config.draft.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.name, "scrim-room");
        assert_eq!(config.room.capacity, 10);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = CoreConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_capacity_below_minimum_rejected() {
        let mut config = CoreConfig::default();
        config.room.capacity = 1;
        assert!(validate_config(&config).is_err());

        config.room.capacity = 2;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_min_ready_floor() {
        let mut config = CoreConfig::default();
        config.room.min_ready_players = 1;
        assert!(validate_config(&config).is_err());
    }
}
