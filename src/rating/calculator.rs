//! Rating calculator trait and implementations
//!
//! This module defines the interface for post-match rating calculations and
//! provides a no-op implementation for testing or fallback.

use crate::error::{CoreError, Result};
use crate::types::{MatchOutcome, MatchResult, PlayerId, RatingDelta, TeamSide};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of rating a completed match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingReport {
    /// One delta per participating player that reported a stat line
    pub deltas: Vec<RatingDelta>,
    /// Participant with the highest performance score, if any stats were
    /// reported
    pub mvp_id: Option<PlayerId>,
}

/// Trait for computing rating changes after matches
pub trait RatingCalculator: Send + Sync {
    /// Compute rating deltas and the MVP for a completed match.
    ///
    /// # Arguments
    /// * `result` - Final score, team rosters and per-player stat lines
    /// * `current_ratings` - Current rating snapshot per player; players
    ///   missing from the map are treated as holding the initial rating
    ///
    /// Rostered players without a stat line receive no delta entry; stat
    /// lines for players on neither roster are ignored.
    fn rate_match(
        &self,
        result: &MatchResult,
        current_ratings: &HashMap<PlayerId, i32>,
    ) -> Result<RatingReport>;

    /// Get the initial rating for new players
    fn initial_rating(&self) -> i32;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> Result<()>;
}

/// Classify one player's outcome from the side result
pub(crate) fn player_outcome(side: TeamSide, winner: Option<TeamSide>) -> MatchOutcome {
    match winner {
        None => MatchOutcome::Draw,
        Some(winning_side) if winning_side == side => MatchOutcome::Win,
        Some(_) => MatchOutcome::Loss,
    }
}

pub(crate) fn validate_match_result(result: &MatchResult) -> Result<()> {
    if result.team_a.is_empty() && result.team_b.is_empty() {
        return Err(CoreError::InvalidMatchResult {
            reason: "Match has no rostered players".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Rating calculator that records outcomes but never moves ratings.
///
/// Useful for tests and for deployments that track results without a
/// competitive ladder.
#[derive(Debug, Clone)]
pub struct NoOpRatingCalculator {
    initial_rating: i32,
}

impl NoOpRatingCalculator {
    pub fn new(initial_rating: i32) -> Self {
        Self { initial_rating }
    }
}

impl Default for NoOpRatingCalculator {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl RatingCalculator for NoOpRatingCalculator {
    fn rate_match(
        &self,
        result: &MatchResult,
        current_ratings: &HashMap<PlayerId, i32>,
    ) -> Result<RatingReport> {
        validate_match_result(result)?;

        let winner = result.winner();
        let deltas = result
            .stats
            .iter()
            .filter_map(|stat| {
                let side = result.side_of(&stat.player_id)?;
                let rating = current_ratings
                    .get(&stat.player_id)
                    .copied()
                    .unwrap_or(self.initial_rating);
                Some(RatingDelta {
                    player_id: stat.player_id.clone(),
                    old_rating: rating,
                    new_rating: rating,
                    change: 0,
                    outcome: player_outcome(side, winner),
                })
            })
            .collect();

        Ok(RatingReport {
            deltas,
            mvp_id: None,
        })
    }

    fn initial_rating(&self) -> i32 {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "no_op",
            "initial_rating": self.initial_rating,
        })
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        if let Some(rating) = config.get("initial_rating").and_then(|v| v.as_i64()) {
            self.initial_rating = rating as i32;
        }
        Ok(())
    }
}
