//! Scrim Room - match coordination core for competitive play
//!
//! This crate provides the algorithmic core for small-group competitive
//! matches: Elo-balanced team assignment, a quorum-voted map ban/pick
//! draft, and post-match rating updates with MVP selection.

pub mod balance;
pub mod config;
pub mod draft;
pub mod error;
pub mod events;
pub mod rating;
pub mod room;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{CoreError, ErrorCategory, Result};
pub use types::*;

// Re-export key components
pub use balance::{ExhaustiveBalancer, GreedyBalancer, TeamBalancer};
pub use draft::{DraftSession, DraftStatus, VoteOutcome};
pub use events::{EventSink, NullEventSink};
pub use rating::{EloRatingCalculator, RatingCalculator, RatingStorage};
pub use room::{RoomManager, RoomPhase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
