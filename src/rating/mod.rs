//! Rating system built on tiered-K Elo
//!
//! This module provides post-match rating calculations, MVP selection, and
//! a storage interface for rating snapshots and lifetime counters, using
//! the skillratings crate for the Elo expected-score model.

pub mod calculator;
pub mod elo;
pub mod storage;

// Re-export commonly used types
pub use calculator::{NoOpRatingCalculator, RatingCalculator, RatingReport};
pub use elo::{EloRatingCalculator, ExtendedEloConfig};
pub use storage::{InMemoryRatingStorage, RatingEntry, RatingStorage};
