//! Configuration management for the match coordination core
//!
//! This module handles all configuration loading from environment variables,
//! validation, and default values for the coordination components.

pub mod app;
pub mod balance;
pub mod draft;

// Re-export commonly used types
pub use app::{validate_config, CoreConfig, RoomSettings, ServiceSettings};
pub use balance::BalanceConfig;
pub use draft::{DraftConfig, DEFAULT_MAP_POOL};
