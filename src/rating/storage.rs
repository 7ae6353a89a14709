//! Rating storage interface and implementations
//!
//! This module defines the interface for keeping player rating snapshots and
//! lifetime counters between matches, with an in-memory implementation. A
//! durable store belongs to the persistence collaborator; this is the
//! snapshot the core reads from and writes back to.

use crate::error::{CoreError, Result};
use crate::types::{MatchOutcome, PlayerId, RatingDelta, StatLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage entry for a player's rating with lifetime counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntry {
    pub player_id: PlayerId,
    pub rating: i32,
    pub matches: u64,
    pub wins: u64,
    pub losses: u64,
    pub kills: u64,
    pub deaths: u64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new entry for a player entering the ladder
    pub fn new(player_id: PlayerId, initial_rating: i32) -> Self {
        let now = Utc::now();
        Self {
            player_id,
            rating: initial_rating,
            matches: 0,
            wins: 0,
            losses: 0,
            kills: 0,
            deaths: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Apply one match's delta and stat line to this entry
    pub fn apply(&mut self, delta: &RatingDelta, stats: Option<&StatLine>) {
        self.rating = delta.new_rating;
        self.matches += 1;
        match delta.outcome {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Loss => self.losses += 1,
            MatchOutcome::Draw => {}
        }
        if let Some(stat) = stats {
            self.kills += stat.kills as u64;
            self.deaths += stat.deaths as u64;
        }
        self.last_updated = Utc::now();
    }
}

/// Trait for rating storage operations
pub trait RatingStorage: Send + Sync {
    /// Get a player's rating entry
    fn get_rating(&self, player_id: &str) -> Result<Option<RatingEntry>>;

    /// Get entries for multiple players; missing players are absent from the
    /// returned map
    fn get_ratings(&self, player_ids: &[PlayerId]) -> Result<HashMap<PlayerId, RatingEntry>>;

    /// Current rating values for multiple players, falling back to `default`
    /// for unknown players
    fn current_ratings(
        &self,
        player_ids: &[PlayerId],
        default: i32,
    ) -> Result<HashMap<PlayerId, i32>> {
        let entries = self.get_ratings(player_ids)?;
        Ok(player_ids
            .iter()
            .map(|id| {
                let rating = entries.get(id).map(|e| e.rating).unwrap_or(default);
                (id.clone(), rating)
            })
            .collect())
    }

    /// Store or replace a player's entry
    fn store_entry(&self, entry: RatingEntry) -> Result<()>;

    /// Apply a match delta (and optional stat line) to a player, creating
    /// the entry if the player is new
    fn apply_delta(&self, delta: &RatingDelta, stats: Option<&StatLine>) -> Result<()>;

    /// Get all stored entries
    fn all_entries(&self) -> Result<HashMap<PlayerId, RatingEntry>>;

    /// Get total number of tracked players
    fn player_count(&self) -> Result<usize>;
}

/// In-memory rating storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStorage {
    entries: RwLock<HashMap<PlayerId, RatingEntry>>,
}

impl InMemoryRatingStorage {
    /// Create a new in-memory rating storage
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl RatingStorage for InMemoryRatingStorage {
    fn get_rating(&self, player_id: &str) -> Result<Option<RatingEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;
        Ok(entries.get(player_id).cloned())
    }

    fn get_ratings(&self, player_ids: &[PlayerId]) -> Result<HashMap<PlayerId, RatingEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;
        Ok(player_ids
            .iter()
            .filter_map(|id| entries.get(id).map(|e| (id.clone(), e.clone())))
            .collect())
    }

    fn store_entry(&self, entry: RatingEntry) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::InternalError {
                message: "Failed to acquire ratings write lock".to_string(),
            })?;
        entries.insert(entry.player_id.clone(), entry);
        Ok(())
    }

    fn apply_delta(&self, delta: &RatingDelta, stats: Option<&StatLine>) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::InternalError {
                message: "Failed to acquire ratings write lock".to_string(),
            })?;
        let entry = entries
            .entry(delta.player_id.clone())
            .or_insert_with(|| RatingEntry::new(delta.player_id.clone(), delta.old_rating));
        entry.apply(delta, stats);
        Ok(())
    }

    fn all_entries(&self) -> Result<HashMap<PlayerId, RatingEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;
        Ok(entries.clone())
    }

    fn player_count(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;
        Ok(entries.len())
    }
}
