//! Tiered-K Elo rating calculator
//!
//! This module provides the concrete implementation of the rating calculator
//! using the Elo expected-score model from the skillratings crate, extended
//! with rating-tier K selection and a kill/death performance modifier.

use crate::error::{CoreError, Result};
use crate::rating::calculator::{
    player_outcome, validate_match_result, RatingCalculator, RatingReport,
};
use crate::types::{MatchResult, PlayerId, RatingDelta, TeamSide};
use crate::utils::average_rating;
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloConfig, EloRating};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Extended configuration for the Elo rating system
/// This wraps the skillratings EloConfig with tier and performance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedEloConfig {
    /// Core Elo parameters; `k` is the default K-factor
    pub elo_config: EloConfig,
    /// Players below this rating move faster
    pub novice_threshold: i32,
    pub novice_k: f64,
    /// Players above this rating move slower
    pub veteran_threshold: i32,
    pub veteran_k: f64,
    /// Rating assumed for players without a stored rating
    pub default_rating: i32,
    /// Ratings never drop below this floor
    pub min_rating: i32,
    /// Kill/death ratio above which the delta is boosted
    pub kd_bonus_threshold: f64,
    pub kd_bonus: f64,
    /// Kill/death ratio below which the delta is dampened
    pub kd_penalty_threshold: f64,
    pub kd_penalty: f64,
    /// Weight of assists in the performance score
    pub assist_weight: f64,
}

impl Default for ExtendedEloConfig {
    fn default() -> Self {
        Self {
            elo_config: EloConfig { k: 32.0 },
            novice_threshold: 1200,
            novice_k: 40.0,
            veteran_threshold: 1800,
            veteran_k: 24.0,
            default_rating: 1000,
            min_rating: 0,
            kd_bonus_threshold: 1.5,
            kd_bonus: 1.2,
            kd_penalty_threshold: 0.8,
            kd_penalty: 0.8,
            assist_weight: 0.3,
        }
    }
}

impl ExtendedEloConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.elo_config.k <= 0.0 || self.novice_k <= 0.0 || self.veteran_k <= 0.0 {
            return Err(CoreError::ConfigurationError {
                message: "K-factors must be positive".to_string(),
            }
            .into());
        }

        if self.novice_threshold > self.veteran_threshold {
            return Err(CoreError::ConfigurationError {
                message: "Novice threshold must not exceed veteran threshold".to_string(),
            }
            .into());
        }

        if self.kd_bonus <= 0.0 || self.kd_penalty <= 0.0 {
            return Err(CoreError::ConfigurationError {
                message: "Performance factors must be positive".to_string(),
            }
            .into());
        }

        if self.kd_penalty_threshold > self.kd_bonus_threshold {
            return Err(CoreError::ConfigurationError {
                message: "KD penalty threshold must not exceed bonus threshold".to_string(),
            }
            .into());
        }

        if self.assist_weight < 0.0 {
            return Err(CoreError::ConfigurationError {
                message: "Assist weight must be non-negative".to_string(),
            }
            .into());
        }

        if self.min_rating > self.default_rating {
            return Err(CoreError::ConfigurationError {
                message: "Minimum rating must not exceed the default rating".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating calculator implementation
#[derive(Debug)]
pub struct EloRatingCalculator {
    config: ExtendedEloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: ExtendedEloConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// K-factor for a player's current rating tier
    fn k_factor(&self, rating: i32) -> f64 {
        if rating < self.config.novice_threshold {
            self.config.novice_k
        } else if rating > self.config.veteran_threshold {
            self.config.veteran_k
        } else {
            self.config.elo_config.k
        }
    }

    /// Delta multiplier from the match kill/death ratio
    fn performance_modifier(&self, kills: u32, deaths: u32) -> f64 {
        let kd = if deaths > 0 {
            kills as f64 / deaths as f64
        } else {
            kills as f64
        };

        if kd > self.config.kd_bonus_threshold {
            self.config.kd_bonus
        } else if kd < self.config.kd_penalty_threshold {
            self.config.kd_penalty
        } else {
            1.0
        }
    }

    /// Performance score used for MVP selection:
    /// `(kills + assists * weight) / max(deaths, 1)`
    pub fn performance_score(&self, kills: u32, deaths: u32, assists: u32) -> f64 {
        (kills as f64 + assists as f64 * self.config.assist_weight) / deaths.max(1) as f64
    }

    fn side_average(&self, side: &[PlayerId], ratings: &HashMap<PlayerId, i32>) -> f64 {
        let member_ratings: Vec<i32> = side
            .iter()
            .map(|p| {
                ratings
                    .get(p)
                    .copied()
                    .unwrap_or(self.config.default_rating)
            })
            .collect();
        average_rating(&member_ratings, self.config.default_rating as f64)
    }

    fn select_mvp(&self, result: &MatchResult) -> Option<PlayerId> {
        let mut mvp: Option<(PlayerId, f64)> = None;
        for stat in &result.stats {
            if result.side_of(&stat.player_id).is_none() {
                continue;
            }
            let score = self.performance_score(stat.kills, stat.deaths, stat.assists);
            // Strict comparison keeps the first-encountered player on ties.
            match &mvp {
                Some((_, best)) if score <= *best => {}
                _ => mvp = Some((stat.player_id.clone(), score)),
            }
        }
        mvp.map(|(player_id, _)| player_id)
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn rate_match(
        &self,
        result: &MatchResult,
        current_ratings: &HashMap<PlayerId, i32>,
    ) -> Result<RatingReport> {
        validate_match_result(result)?;

        let winner = result.winner();
        let (actual_a, actual_b) = match winner {
            Some(TeamSide::A) => (1.0, 0.0),
            Some(TeamSide::B) => (0.0, 1.0),
            None => (0.5, 0.5),
        };

        let avg_a = self.side_average(&result.team_a, current_ratings);
        let avg_b = self.side_average(&result.team_b, current_ratings);
        let (expected_a, expected_b) =
            expected_score(&EloRating { rating: avg_a }, &EloRating { rating: avg_b });

        let mut deltas = Vec::new();
        for stat in &result.stats {
            let side = match result.side_of(&stat.player_id) {
                Some(side) => side,
                None => {
                    debug!(
                        player_id = %stat.player_id,
                        "ignoring stat line for player on neither roster"
                    );
                    continue;
                }
            };

            let old_rating = current_ratings
                .get(&stat.player_id)
                .copied()
                .unwrap_or(self.config.default_rating);
            let (actual, expected) = match side {
                TeamSide::A => (actual_a, expected_a),
                TeamSide::B => (actual_b, expected_b),
            };

            let raw = self.k_factor(old_rating)
                * (actual - expected)
                * self.performance_modifier(stat.kills, stat.deaths);

            let change = if raw.is_finite() {
                raw.round() as i32
            } else {
                warn!(
                    player_id = %stat.player_id,
                    "non-finite rating delta, falling back to zero change"
                );
                0
            };

            let new_rating = (old_rating + change).max(self.config.min_rating);
            deltas.push(RatingDelta {
                player_id: stat.player_id.clone(),
                old_rating,
                new_rating,
                change: new_rating - old_rating,
                outcome: player_outcome(side, winner),
            });
        }

        Ok(RatingReport {
            deltas,
            mvp_id: self.select_mvp(result),
        })
    }

    fn initial_rating(&self) -> i32 {
        self.config.default_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let new_config: ExtendedEloConfig =
            serde_json::from_value(config).map_err(|e| CoreError::ConfigurationError {
                message: format!("Invalid Elo configuration: {}", e),
            })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
