//! Room instance implementation and lifecycle management
//!
//! This module contains the core room logic for tracking the roster,
//! readiness, and phase transitions from open lobby to finished match.

use crate::error::{CoreError, Result};
use crate::types::{DraftId, MatchId, PlayerId, RoomId, RosterEntry, TeamSplit};
use crate::utils::{current_timestamp, generate_room_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Possible phases of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    /// Room is open and collecting players
    Waiting,
    /// Every member is ready; the roster can be balanced
    Ready,
    /// Teams are assigned; the draft can begin
    TeamsAssigned,
    /// Draft session in progress
    Drafting,
    /// Match created and being played
    Playing,
    /// Match result applied (terminal state)
    Finished,
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoomPhase::Waiting => "waiting",
            RoomPhase::Ready => "ready",
            RoomPhase::TeamsAssigned => "teams_assigned",
            RoomPhase::Drafting => "drafting",
            RoomPhase::Playing => "playing",
            RoomPhase::Finished => "finished",
        };
        write!(f, "{}", name)
    }
}

/// Concrete room state for one group of players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInstance {
    id: RoomId,
    roster: Vec<RosterEntry>,
    phase: RoomPhase,
    capacity: usize,
    min_ready_players: usize,
    teams: Option<TeamSplit>,
    draft_id: Option<DraftId>,
    match_id: Option<MatchId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoomInstance {
    /// Create a new room with a generated ID
    pub fn new(capacity: usize, min_ready_players: usize) -> Self {
        Self::with_id(generate_room_id(), capacity, min_ready_players)
    }

    /// Create a room with a specific ID
    pub fn with_id(id: RoomId, capacity: usize, min_ready_players: usize) -> Self {
        let now = current_timestamp();
        Self {
            id,
            roster: Vec::new(),
            phase: RoomPhase::Waiting,
            capacity,
            min_ready_players,
            teams: None,
            draft_id: None,
            match_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn teams(&self) -> Option<&TeamSplit> {
        self.teams.as_ref()
    }

    pub fn draft_id(&self) -> Option<DraftId> {
        self.draft_id
    }

    pub fn match_id(&self) -> Option<MatchId> {
        self.match_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.capacity
    }

    /// Whether the room can accept another player
    pub fn is_open(&self) -> bool {
        matches!(self.phase, RoomPhase::Waiting | RoomPhase::Ready) && !self.is_full()
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }

    fn phase_error(&self) -> CoreError {
        CoreError::InvalidRoomPhase {
            room_id: self.id.to_string(),
            phase: self.phase.to_string(),
        }
    }

    fn recompute_readiness(&mut self) {
        let all_ready = self.roster.len() >= self.min_ready_players
            && self.roster.iter().all(|entry| entry.ready);
        self.phase = if all_ready {
            RoomPhase::Ready
        } else {
            RoomPhase::Waiting
        };
    }

    /// Add a player with their current rating snapshot
    pub fn add_player(&mut self, player_id: impl Into<PlayerId>, rating: i32) -> Result<()> {
        if !matches!(self.phase, RoomPhase::Waiting | RoomPhase::Ready) {
            return Err(self.phase_error().into());
        }

        let player_id = player_id.into();
        if self.roster.iter().any(|entry| entry.player_id == player_id) {
            return Err(CoreError::PlayerAlreadyJoined {
                room_id: self.id.to_string(),
                player_id,
            }
            .into());
        }

        if self.is_full() {
            return Err(CoreError::RoomFull {
                room_id: self.id.to_string(),
            }
            .into());
        }

        self.roster.push(RosterEntry::new(player_id, rating));
        // A newcomer is not ready yet, so the room drops back to waiting.
        self.recompute_readiness();
        self.touch();
        Ok(())
    }

    /// Remove a player before the roster is locked into teams.
    ///
    /// Returns the removed entry, or `None` for an unknown player.
    pub fn remove_player(&mut self, player_id: &str) -> Result<Option<RosterEntry>> {
        if !matches!(
            self.phase,
            RoomPhase::Waiting | RoomPhase::Ready | RoomPhase::TeamsAssigned
        ) {
            return Err(self.phase_error().into());
        }

        let mut removed = None;
        self.roster.retain(|entry| {
            if entry.player_id == player_id {
                removed = Some(entry.clone());
                false
            } else {
                true
            }
        });

        if removed.is_some() {
            // Any departure invalidates an existing split.
            self.teams = None;
            self.recompute_readiness();
            self.touch();
        }

        Ok(removed)
    }

    /// Flip a member's readiness flag; returns whether the whole room is
    /// now ready
    pub fn set_ready(&mut self, player_id: &str, ready: bool) -> Result<bool> {
        if !matches!(self.phase, RoomPhase::Waiting | RoomPhase::Ready) {
            return Err(self.phase_error().into());
        }

        let entry = self
            .roster
            .iter_mut()
            .find(|entry| entry.player_id == player_id)
            .ok_or_else(|| CoreError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;
        entry.ready = ready;

        self.recompute_readiness();
        self.touch();
        Ok(self.phase == RoomPhase::Ready)
    }

    /// Attach a balanced split to a ready room
    pub fn assign_teams(&mut self, split: TeamSplit) -> Result<()> {
        if self.phase != RoomPhase::Ready {
            return Err(self.phase_error().into());
        }

        self.teams = Some(split);
        self.phase = RoomPhase::TeamsAssigned;
        self.touch();
        Ok(())
    }

    /// Move into the drafting phase
    pub fn begin_draft(&mut self, draft_id: DraftId) -> Result<()> {
        if self.phase != RoomPhase::TeamsAssigned {
            return Err(self.phase_error().into());
        }

        self.draft_id = Some(draft_id);
        self.phase = RoomPhase::Drafting;
        self.touch();
        Ok(())
    }

    /// Move into the playing phase once the draft produced a match
    pub fn begin_match(&mut self, match_id: MatchId) -> Result<()> {
        if self.phase != RoomPhase::Drafting {
            return Err(self.phase_error().into());
        }

        self.match_id = Some(match_id);
        self.phase = RoomPhase::Playing;
        self.touch();
        Ok(())
    }

    /// Terminal transition after the match result is applied
    pub fn finish(&mut self) -> Result<()> {
        if self.phase != RoomPhase::Playing {
            return Err(self.phase_error().into());
        }

        self.phase = RoomPhase::Finished;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_room() -> RoomInstance {
        RoomInstance::new(10, 2)
    }

    fn split(team_a: &[&str], team_b: &[&str]) -> TeamSplit {
        TeamSplit {
            team_a: team_a.iter().map(|p| p.to_string()).collect(),
            team_b: team_b.iter().map(|p| p.to_string()).collect(),
            rating_diff: 0,
            team_a_avg: 1000,
            team_b_avg: 1000,
        }
    }

    #[test]
    fn test_room_creation() {
        let room = test_room();
        assert_eq!(room.phase(), RoomPhase::Waiting);
        assert!(room.roster().is_empty());
        assert!(room.is_open());
        assert!(!room.is_full());
        assert!(room.teams().is_none());
    }

    #[test]
    fn test_add_and_duplicate_player() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        assert_eq!(room.roster().len(), 1);

        let result = room.add_player("p1", 1200);
        let err = result.unwrap_err();
        let core = err.downcast_ref::<CoreError>().unwrap();
        assert!(matches!(core, CoreError::PlayerAlreadyJoined { .. }));
    }

    #[test]
    fn test_capacity_limit() {
        let mut room = RoomInstance::new(2, 2);
        room.add_player("p1", 1000).unwrap();
        room.add_player("p2", 1000).unwrap();
        assert!(room.is_full());

        let result = room.add_player("p3", 1000);
        let err = result.unwrap_err();
        let core = err.downcast_ref::<CoreError>().unwrap();
        assert!(matches!(core, CoreError::RoomFull { .. }));
    }

    #[test]
    fn test_ready_flow() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        room.add_player("p2", 1100).unwrap();

        // One ready player is not enough.
        let all_ready = room.set_ready("p1", true).unwrap();
        assert!(!all_ready);
        assert_eq!(room.phase(), RoomPhase::Waiting);

        let all_ready = room.set_ready("p2", true).unwrap();
        assert!(all_ready);
        assert_eq!(room.phase(), RoomPhase::Ready);

        // Backing out drops the room to waiting again.
        room.set_ready("p2", false).unwrap();
        assert_eq!(room.phase(), RoomPhase::Waiting);
    }

    #[test]
    fn test_single_player_cannot_ready_room() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        let all_ready = room.set_ready("p1", true).unwrap();
        assert!(!all_ready);
        assert_eq!(room.phase(), RoomPhase::Waiting);
    }

    #[test]
    fn test_ready_unknown_player() {
        let mut room = test_room();
        assert!(room.set_ready("ghost", true).is_err());
    }

    #[test]
    fn test_joining_resets_readiness() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        room.add_player("p2", 1100).unwrap();
        room.set_ready("p1", true).unwrap();
        room.set_ready("p2", true).unwrap();
        assert_eq!(room.phase(), RoomPhase::Ready);

        room.add_player("p3", 900).unwrap();
        assert_eq!(room.phase(), RoomPhase::Waiting);
    }

    #[test]
    fn test_full_phase_progression() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        room.add_player("p2", 1100).unwrap();
        room.set_ready("p1", true).unwrap();
        room.set_ready("p2", true).unwrap();

        room.assign_teams(split(&["p1"], &["p2"])).unwrap();
        assert_eq!(room.phase(), RoomPhase::TeamsAssigned);

        let draft_id = crate::utils::generate_draft_id();
        room.begin_draft(draft_id).unwrap();
        assert_eq!(room.phase(), RoomPhase::Drafting);
        assert_eq!(room.draft_id(), Some(draft_id));

        let match_id = crate::utils::generate_match_id();
        room.begin_match(match_id).unwrap();
        assert_eq!(room.phase(), RoomPhase::Playing);
        assert_eq!(room.match_id(), Some(match_id));

        room.finish().unwrap();
        assert_eq!(room.phase(), RoomPhase::Finished);
    }

    #[test]
    fn test_out_of_order_transitions_rejected() {
        let mut room = test_room();
        assert!(room.assign_teams(split(&["p1"], &["p2"])).is_err());
        assert!(room.begin_draft(crate::utils::generate_draft_id()).is_err());
        assert!(room.begin_match(crate::utils::generate_match_id()).is_err());
        assert!(room.finish().is_err());
    }

    #[test]
    fn test_leave_invalidates_split() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        room.add_player("p2", 1100).unwrap();
        room.set_ready("p1", true).unwrap();
        room.set_ready("p2", true).unwrap();
        room.assign_teams(split(&["p1"], &["p2"])).unwrap();

        let removed = room.remove_player("p2").unwrap();
        assert_eq!(removed.unwrap().player_id, "p2");
        assert!(room.teams().is_none());
        assert_eq!(room.phase(), RoomPhase::Waiting);

        // Removing a stranger is a no-op.
        assert!(room.remove_player("ghost").unwrap().is_none());
    }

    #[test]
    fn test_no_join_or_leave_mid_draft() {
        let mut room = test_room();
        room.add_player("p1", 1000).unwrap();
        room.add_player("p2", 1100).unwrap();
        room.set_ready("p1", true).unwrap();
        room.set_ready("p2", true).unwrap();
        room.assign_teams(split(&["p1"], &["p2"])).unwrap();
        room.begin_draft(crate::utils::generate_draft_id()).unwrap();

        assert!(room.add_player("p3", 900).is_err());
        assert!(room.remove_player("p1").is_err());
        assert!(room.set_ready("p1", false).is_err());
        assert!(!room.is_open());
    }
}
