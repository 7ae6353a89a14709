//! Error types for the match coordination core
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Broad classification of an error, used by callers to decide how to recover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or insufficient input; retry with corrected input
    Validation,
    /// Operation attempted against a terminal or mismatched state
    State,
    /// Referenced snapshot does not exist; retry with fresh state
    NotFound,
    /// Unexpected internal failure (lock poisoning and similar)
    Internal,
}

/// Custom error types for specific coordination scenarios
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Insufficient players: need at least {required}, got {found}")]
    InsufficientPlayers { required: usize, found: usize },

    #[error("Map not available: {map}")]
    MapUnavailable { map: String },

    #[error("Wrong turn: expected team {expected_team} to {expected_action}")]
    WrongTurn {
        expected_team: String,
        expected_action: String,
    },

    #[error("Player {player_id} is not on the acting team")]
    NotYourTeam { player_id: String },

    #[error("Draft already completed: {draft_id}")]
    DraftCompleted { draft_id: String },

    #[error("Match already finished: {match_id}")]
    MatchAlreadyFinished { match_id: String },

    #[error("Room {room_id} is in phase {phase}, which does not allow this operation")]
    InvalidRoomPhase { room_id: String, phase: String },

    #[error("Room is full: {room_id}")]
    RoomFull { room_id: String },

    #[error("Player {player_id} already joined room {room_id}")]
    PlayerAlreadyJoined { room_id: String, player_id: String },

    #[error("Invalid match result: {reason}")]
    InvalidMatchResult { reason: String },

    #[error("Room not found: {room_id}")]
    RoomNotFound { room_id: String },

    #[error("Draft not found: {draft_id}")]
    DraftNotFound { draft_id: String },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Classify this error for caller-side recovery decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoreError::InsufficientPlayers { .. }
            | CoreError::MapUnavailable { .. }
            | CoreError::WrongTurn { .. }
            | CoreError::NotYourTeam { .. }
            | CoreError::RoomFull { .. }
            | CoreError::PlayerAlreadyJoined { .. }
            | CoreError::InvalidMatchResult { .. }
            | CoreError::ConfigurationError { .. } => ErrorCategory::Validation,
            CoreError::DraftCompleted { .. }
            | CoreError::MatchAlreadyFinished { .. }
            | CoreError::InvalidRoomPhase { .. } => ErrorCategory::State,
            CoreError::RoomNotFound { .. }
            | CoreError::DraftNotFound { .. }
            | CoreError::MatchNotFound { .. }
            | CoreError::PlayerNotFound { .. } => ErrorCategory::NotFound,
            CoreError::InternalError { .. } => ErrorCategory::Internal,
        }
    }
}
