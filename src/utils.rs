//! Utility functions for the match coordination core

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique room ID
pub fn generate_room_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new unique draft session ID
pub fn generate_draft_id() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new unique match ID
pub fn generate_match_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two average ratings
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

/// Mean of a rating slice, or `default` for an empty slice
pub fn average_rating(ratings: &[i32], default: f64) -> f64 {
    if ratings.is_empty() {
        return default;
    }
    ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64
}

/// Votes required for a team decision: more than half of the acting team,
/// i.e. `ceil(team_size / 2)`
pub fn majority_threshold(team_size: usize) -> usize {
    team_size.div_ceil(2)
}
