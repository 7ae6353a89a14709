//! Team balancing for room rosters
//!
//! This module partitions a roster into two teams with minimal average-rating
//! disparity. The exhaustive splitter is optimal for the small rosters the
//! core targets; a greedy heuristic covers anything larger.

pub mod splitter;

// Re-export commonly used types
pub use splitter::{ExhaustiveBalancer, GreedyBalancer, TeamBalancer};
