//! Common types used throughout the match coordination core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::Outcomes;
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = String;

/// Identifier for a map in the candidate pool
pub type MapId = String;

/// Unique identifier for rooms
pub type RoomId = Uuid;

/// Unique identifier for draft sessions
pub type DraftId = Uuid;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// One of the two sides a roster is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    /// The opposing side
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

/// Kind of draft turn a team takes on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftAction {
    /// Eliminate the map from the candidate pool
    Ban,
    /// Select the map as the tentative final choice
    Pick,
}

impl std::fmt::Display for DraftAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftAction::Ban => write!(f, "ban"),
            DraftAction::Pick => write!(f, "pick"),
        }
    }
}

/// Outcome category for a single player's match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl From<Outcomes> for MatchOutcome {
    fn from(outcome: Outcomes) -> Self {
        match outcome {
            Outcomes::WIN => MatchOutcome::Win,
            Outcomes::LOSS => MatchOutcome::Loss,
            Outcomes::DRAW => MatchOutcome::Draw,
        }
    }
}

impl From<MatchOutcome> for Outcomes {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::Win => Outcomes::WIN,
            MatchOutcome::Loss => Outcomes::LOSS,
            MatchOutcome::Draw => Outcomes::DRAW,
        }
    }
}

/// A player's seat in a room: identity, rating snapshot and readiness flag.
///
/// Exists only for the lifetime of the room; the persistence collaborator
/// owns the underlying player record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub rating: i32,
    pub ready: bool,
}

impl RosterEntry {
    pub fn new(player_id: impl Into<PlayerId>, rating: i32) -> Self {
        Self {
            player_id: player_id.into(),
            rating,
            ready: false,
        }
    }
}

/// Result of balancing a roster into two teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSplit {
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    /// Absolute difference of team average ratings, rounded to nearest integer
    pub rating_diff: i32,
    pub team_a_avg: i32,
    pub team_b_avg: i32,
}

impl TeamSplit {
    /// Which side a player landed on, if any
    pub fn side_of(&self, player_id: &str) -> Option<TeamSide> {
        if self.team_a.iter().any(|p| p == player_id) {
            Some(TeamSide::A)
        } else if self.team_b.iter().any(|p| p == player_id) {
            Some(TeamSide::B)
        } else {
            None
        }
    }
}

/// Per-player stat line reported for a finished match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLine {
    pub player_id: PlayerId,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

impl StatLine {
    pub fn new(player_id: impl Into<PlayerId>, kills: u32, deaths: u32, assists: u32) -> Self {
        Self {
            player_id: player_id.into(),
            kills,
            deaths,
            assists,
        }
    }
}

/// Completed-match input consumed by the rating engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub score_a: u32,
    pub score_b: u32,
    pub stats: Vec<StatLine>,
}

impl MatchResult {
    /// Side outcome by score comparison; `None` means a draw
    pub fn winner(&self) -> Option<TeamSide> {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Some(TeamSide::A),
            std::cmp::Ordering::Less => Some(TeamSide::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Which side a player is rostered on, if any
    pub fn side_of(&self, player_id: &str) -> Option<TeamSide> {
        if self.team_a.iter().any(|p| p == player_id) {
            Some(TeamSide::A)
        } else if self.team_b.iter().any(|p| p == player_id) {
            Some(TeamSide::B)
        } else {
            None
        }
    }
}

/// Rating change produced for one player by one match. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingDelta {
    pub player_id: PlayerId,
    pub old_rating: i32,
    pub new_rating: i32,
    /// Signed applied change; always equals `new_rating - old_rating`
    pub change: i32,
    pub outcome: MatchOutcome,
}

/// Lifecycle state of a match record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Playing,
    Finished,
}

/// Match descriptor created when a draft finalizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub room_id: RoomId,
    pub map: MapId,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Option<TeamSide>,
    pub mvp_id: Option<PlayerId>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Event emitted when a player joins a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinedRoom {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub roster: Vec<RosterEntry>,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a player leaves a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLeftRoom {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub remaining: Vec<RosterEntry>,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a room's roster has been split into teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsAssigned {
    pub room_id: RoomId,
    pub split: TeamSplit,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a draft finalizes and a match is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCreated {
    pub match_id: MatchId,
    pub room_id: RoomId,
    pub map: MapId,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub timestamp: DateTime<Utc>,
}

/// Event emitted when a match result has been applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFinished {
    pub match_id: MatchId,
    pub room_id: RoomId,
    pub winner: Option<TeamSide>,
    pub mvp_id: Option<PlayerId>,
    pub deltas: Vec<RatingDelta>,
    pub timestamp: DateTime<Utc>,
}

/// Union type for all core events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CoreEvent {
    PlayerJoinedRoom(PlayerJoinedRoom),
    PlayerLeftRoom(PlayerLeftRoom),
    TeamsAssigned(TeamsAssigned),
    MatchCreated(MatchCreated),
    MatchFinished(MatchFinished),
}
