//! Room manager implementation orchestrating the coordination components
//!
//! This module provides the core RoomManager that wires the team balancer,
//! draft sessions, and rating engine together over shared room state. Every
//! mutating call takes a write lock on the map it touches, which gives each
//! room and draft the single-mutator discipline the session state machine
//! requires.

use crate::balance::{ExhaustiveBalancer, GreedyBalancer, TeamBalancer};
use crate::config::CoreConfig;
use crate::draft::{DraftSession, VoteOutcome};
use crate::error::{CoreError, Result};
use crate::events::EventSink;
use crate::rating::{
    EloRatingCalculator, ExtendedEloConfig, InMemoryRatingStorage, RatingCalculator, RatingReport,
    RatingStorage,
};
use crate::room::instance::{RoomInstance, RoomPhase};
use crate::types::{
    CoreEvent, DraftAction, DraftId, MatchCreated, MatchFinished, MatchId, MatchRecord,
    MatchResult, MatchStatus, PlayerId, PlayerJoinedRoom, PlayerLeftRoom, RoomId, RosterEntry,
    StatLine, TeamSide, TeamSplit, TeamsAssigned,
};
use crate::utils::current_timestamp;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Statistics about room manager operations
#[derive(Debug, Clone, Default)]
pub struct RoomManagerStats {
    /// Total number of rooms created
    pub rooms_created: u64,
    /// Total number of player joins
    pub players_joined: u64,
    /// Total number of drafts started
    pub drafts_started: u64,
    /// Total number of matches created by finalized drafts
    pub matches_created: u64,
    /// Total number of match results applied
    pub matches_finished: u64,
}

/// The main coordination facade
#[derive(Clone)]
pub struct RoomManager {
    /// Active rooms by ID
    rooms: Arc<RwLock<HashMap<RoomId, RoomInstance>>>,
    /// Active draft sessions by ID
    drafts: Arc<RwLock<HashMap<DraftId, DraftSession>>>,
    /// Match records by ID
    matches: Arc<RwLock<HashMap<MatchId, MatchRecord>>>,
    /// Optimal balancer for small rosters
    balancer: Arc<dyn TeamBalancer>,
    /// Heuristic fallback for rosters beyond the exhaustive ceiling
    fallback_balancer: Arc<dyn TeamBalancer>,
    /// Rating calculator applied to finished matches
    rating_calculator: Arc<dyn RatingCalculator>,
    /// Rating snapshot and counter store
    rating_storage: Arc<dyn RatingStorage>,
    /// Event sink for outbound events
    event_sink: Arc<dyn EventSink>,
    config: CoreConfig,
    stats: Arc<RwLock<RoomManagerStats>>,
}

impl RoomManager {
    /// Create a manager with the default Elo calculator and in-memory storage
    pub fn new(config: CoreConfig, event_sink: Arc<dyn EventSink>) -> Result<Self> {
        let calculator = EloRatingCalculator::new(ExtendedEloConfig::default())?;
        Ok(Self::with_components(
            config,
            event_sink,
            Arc::new(calculator),
            Arc::new(InMemoryRatingStorage::new()),
        ))
    }

    /// Create a manager with custom rating components
    pub fn with_components(
        config: CoreConfig,
        event_sink: Arc<dyn EventSink>,
        rating_calculator: Arc<dyn RatingCalculator>,
        rating_storage: Arc<dyn RatingStorage>,
    ) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            drafts: Arc::new(RwLock::new(HashMap::new())),
            matches: Arc::new(RwLock::new(HashMap::new())),
            balancer: Arc::new(ExhaustiveBalancer::new()),
            fallback_balancer: Arc::new(GreedyBalancer::new()),
            rating_calculator,
            rating_storage,
            event_sink,
            config,
            stats: Arc::new(RwLock::new(RoomManagerStats::default())),
        }
    }

    /// Create a new empty room and return its ID
    pub fn create_room(&self) -> Result<RoomId> {
        let room = RoomInstance::new(
            self.config.room.capacity,
            self.config.room.min_ready_players,
        );
        let room_id = room.id();

        let mut rooms = self.rooms_write()?;
        rooms.insert(room_id, room);
        drop(rooms);

        self.bump_stats(|stats| stats.rooms_created += 1);
        info!(%room_id, "room created");
        Ok(room_id)
    }

    /// Join a specific room, pulling the player's rating snapshot from
    /// storage (new players enter at the initial rating)
    pub fn join_room(&self, room_id: RoomId, player_id: &str) -> Result<Vec<RosterEntry>> {
        let rating = self
            .rating_storage
            .get_rating(player_id)?
            .map(|entry| entry.rating)
            .unwrap_or_else(|| self.rating_calculator.initial_rating());

        let roster = {
            let mut rooms = self.rooms_write()?;
            let room = rooms
                .get_mut(&room_id)
                .ok_or_else(|| CoreError::RoomNotFound {
                    room_id: room_id.to_string(),
                })?;
            room.add_player(player_id, rating)?;
            room.roster().to_vec()
        };

        self.bump_stats(|stats| stats.players_joined += 1);
        debug!(%room_id, player_id, rating, "player joined room");

        self.event_sink
            .publish(CoreEvent::PlayerJoinedRoom(PlayerJoinedRoom {
                room_id,
                player_id: player_id.to_string(),
                roster: roster.clone(),
                timestamp: current_timestamp(),
            }))?;

        Ok(roster)
    }

    /// Join the first open room, creating a fresh one when none accepts
    /// players
    pub fn quick_join(&self, player_id: &str) -> Result<RoomId> {
        let existing = {
            let rooms = self.rooms_read()?;
            rooms
                .values()
                .find(|room| room.is_open())
                .map(|room| room.id())
        };

        let room_id = match existing {
            Some(id) => id,
            None => self.create_room()?,
        };

        self.join_room(room_id, player_id)?;
        Ok(room_id)
    }

    /// Leave a room; an emptied room is dropped entirely
    pub fn leave_room(&self, room_id: RoomId, player_id: &str) -> Result<()> {
        let remaining = {
            let mut rooms = self.rooms_write()?;
            let room = rooms
                .get_mut(&room_id)
                .ok_or_else(|| CoreError::RoomNotFound {
                    room_id: room_id.to_string(),
                })?;

            if room.remove_player(player_id)?.is_none() {
                return Err(CoreError::PlayerNotFound {
                    player_id: player_id.to_string(),
                }
                .into());
            }

            let remaining = room.roster().to_vec();
            if remaining.is_empty() {
                rooms.remove(&room_id);
                debug!(%room_id, "empty room dropped");
            }
            remaining
        };

        self.event_sink
            .publish(CoreEvent::PlayerLeftRoom(PlayerLeftRoom {
                room_id,
                player_id: player_id.to_string(),
                remaining,
                timestamp: current_timestamp(),
            }))?;

        Ok(())
    }

    /// Flip a player's readiness; returns whether the room is now ready
    pub fn set_ready(&self, room_id: RoomId, player_id: &str, ready: bool) -> Result<bool> {
        let mut rooms = self.rooms_write()?;
        let room = rooms
            .get_mut(&room_id)
            .ok_or_else(|| CoreError::RoomNotFound {
                room_id: room_id.to_string(),
            })?;
        room.set_ready(player_id, ready)
    }

    /// Balance a ready room's roster into two teams.
    ///
    /// Rosters within the configured ceiling get the exhaustive optimal
    /// split; larger rosters fall back to the greedy heuristic.
    pub fn assign_teams(&self, room_id: RoomId) -> Result<TeamSplit> {
        let split = {
            let mut rooms = self.rooms_write()?;
            let room = rooms
                .get_mut(&room_id)
                .ok_or_else(|| CoreError::RoomNotFound {
                    room_id: room_id.to_string(),
                })?;

            if room.phase() != RoomPhase::Ready {
                return Err(CoreError::InvalidRoomPhase {
                    room_id: room_id.to_string(),
                    phase: room.phase().to_string(),
                }
                .into());
            }

            let roster: Vec<(PlayerId, i32)> = room
                .roster()
                .iter()
                .map(|entry| (entry.player_id.clone(), entry.rating))
                .collect();

            let split = if roster.len() <= self.config.balance.max_exhaustive_roster {
                self.balancer.balance(&roster)?
            } else {
                debug!(
                    %room_id,
                    roster_size = roster.len(),
                    "roster beyond exhaustive ceiling, using greedy balancer"
                );
                self.fallback_balancer.balance(&roster)?
            };

            room.assign_teams(split.clone())?;
            split
        };

        info!(
            %room_id,
            rating_diff = split.rating_diff,
            "teams assigned"
        );

        self.event_sink
            .publish(CoreEvent::TeamsAssigned(TeamsAssigned {
                room_id,
                split: split.clone(),
                timestamp: current_timestamp(),
            }))?;

        Ok(split)
    }

    /// Start the map draft for a room with assigned teams
    pub fn start_draft(&self, room_id: RoomId) -> Result<DraftId> {
        let session = {
            let mut rooms = self.rooms_write()?;
            let room = rooms
                .get_mut(&room_id)
                .ok_or_else(|| CoreError::RoomNotFound {
                    room_id: room_id.to_string(),
                })?;

            let split = room.teams().ok_or_else(|| CoreError::InvalidRoomPhase {
                room_id: room_id.to_string(),
                phase: room.phase().to_string(),
            })?;

            let session = DraftSession::new(
                room_id,
                split.team_a.clone(),
                split.team_b.clone(),
                &self.config.draft,
            )?;
            room.begin_draft(session.id())?;
            session
        };

        let draft_id = session.id();
        {
            let mut drafts = self.drafts_write()?;
            drafts.insert(draft_id, session);
        }

        self.bump_stats(|stats| stats.drafts_started += 1);
        info!(%room_id, %draft_id, "draft started");
        Ok(draft_id)
    }

    /// Submit one player's vote for the draft's current turn.
    ///
    /// A finalizing vote registers the match record, moves the room into the
    /// playing phase, and publishes the match-created event.
    pub fn submit_vote(
        &self,
        draft_id: DraftId,
        team: TeamSide,
        action: DraftAction,
        map: &str,
        player_id: &str,
    ) -> Result<VoteOutcome> {
        let outcome = {
            let mut drafts = self.drafts_write()?;
            let session = drafts
                .get_mut(&draft_id)
                .ok_or_else(|| CoreError::DraftNotFound {
                    draft_id: draft_id.to_string(),
                })?;
            session.submit_vote(team, action, map, player_id)?
        };

        if let VoteOutcome::Finalized { event, .. } = &outcome {
            self.register_match(event)?;
        }

        Ok(outcome)
    }

    fn register_match(&self, event: &MatchCreated) -> Result<()> {
        let record = MatchRecord {
            id: event.match_id,
            room_id: event.room_id,
            map: event.map.clone(),
            team_a: event.team_a.clone(),
            team_b: event.team_b.clone(),
            score_a: 0,
            score_b: 0,
            winner: None,
            mvp_id: None,
            status: MatchStatus::Playing,
            created_at: event.timestamp,
            finished_at: None,
        };

        {
            let mut matches = self.matches_write()?;
            matches.insert(record.id, record);
        }

        {
            let mut rooms = self.rooms_write()?;
            match rooms.get_mut(&event.room_id) {
                Some(room) => room.begin_match(event.match_id)?,
                // The draft outlived its room; the match still exists for
                // the caller.
                None => warn!(room_id = %event.room_id, "finalized draft for missing room"),
            }
        }

        self.bump_stats(|stats| stats.matches_created += 1);
        info!(
            match_id = %event.match_id,
            room_id = %event.room_id,
            map = %event.map,
            "match created"
        );

        self.event_sink
            .publish(CoreEvent::MatchCreated(event.clone()))?;
        Ok(())
    }

    /// Apply a final score and stat lines to a playing match.
    ///
    /// Runs the rating calculator over the result, persists every delta and
    /// counter update to storage, finishes the room, and reports the deltas
    /// and MVP back to the caller.
    pub fn submit_result(
        &self,
        match_id: MatchId,
        score_a: u32,
        score_b: u32,
        stats: Vec<StatLine>,
    ) -> Result<RatingReport> {
        let (result, room_id) = {
            let matches = self.matches_read()?;
            let record = matches
                .get(&match_id)
                .ok_or_else(|| CoreError::MatchNotFound {
                    match_id: match_id.to_string(),
                })?;
            if record.status == MatchStatus::Finished {
                return Err(CoreError::MatchAlreadyFinished {
                    match_id: match_id.to_string(),
                }
                .into());
            }

            let result = MatchResult {
                match_id,
                team_a: record.team_a.clone(),
                team_b: record.team_b.clone(),
                score_a,
                score_b,
                stats,
            };
            (result, record.room_id)
        };

        let participants: Vec<PlayerId> = result
            .team_a
            .iter()
            .chain(result.team_b.iter())
            .cloned()
            .collect();
        let current_ratings = self
            .rating_storage
            .current_ratings(&participants, self.rating_calculator.initial_rating())?;

        let report = self.rating_calculator.rate_match(&result, &current_ratings)?;

        for delta in &report.deltas {
            let stat = result
                .stats
                .iter()
                .find(|s| s.player_id == delta.player_id);
            self.rating_storage.apply_delta(delta, stat)?;
        }

        let winner = result.winner();
        {
            let mut matches = self.matches_write()?;
            if let Some(record) = matches.get_mut(&match_id) {
                record.score_a = score_a;
                record.score_b = score_b;
                record.winner = winner;
                record.mvp_id = report.mvp_id.clone();
                record.status = MatchStatus::Finished;
                record.finished_at = Some(current_timestamp());
            }
        }

        {
            let mut rooms = self.rooms_write()?;
            match rooms.get_mut(&room_id) {
                Some(room) => room.finish()?,
                None => warn!(%room_id, "finished match for missing room"),
            }
        }

        self.bump_stats(|stats| stats.matches_finished += 1);
        info!(
            %match_id,
            ?winner,
            mvp = ?report.mvp_id,
            "match result applied"
        );

        self.event_sink
            .publish(CoreEvent::MatchFinished(MatchFinished {
                match_id,
                room_id,
                winner,
                mvp_id: report.mvp_id.clone(),
                deltas: report.deltas.clone(),
                timestamp: current_timestamp(),
            }))?;

        Ok(report)
    }

    /// Snapshot of a room's current state
    pub fn get_room(&self, room_id: RoomId) -> Result<Option<RoomInstance>> {
        let rooms = self.rooms_read()?;
        Ok(rooms.get(&room_id).cloned())
    }

    /// Snapshot of a draft session's current state
    pub fn get_draft(&self, draft_id: DraftId) -> Result<Option<DraftSession>> {
        let drafts = self.drafts_read()?;
        Ok(drafts.get(&draft_id).cloned())
    }

    /// Snapshot of a match record
    pub fn get_match(&self, match_id: MatchId) -> Result<Option<MatchRecord>> {
        let matches = self.matches_read()?;
        Ok(matches.get(&match_id).cloned())
    }

    /// Current manager statistics
    pub fn stats(&self) -> RoomManagerStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn bump_stats(&self, update: impl FnOnce(&mut RoomManagerStats)) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }

    fn rooms_read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<RoomId, RoomInstance>>> {
        self.rooms.read().map_err(|_| {
            CoreError::InternalError {
                message: "Failed to acquire rooms read lock".to_string(),
            }
            .into()
        })
    }

    fn rooms_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<RoomId, RoomInstance>>> {
        self.rooms.write().map_err(|_| {
            CoreError::InternalError {
                message: "Failed to acquire rooms write lock".to_string(),
            }
            .into()
        })
    }

    fn drafts_read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<DraftId, DraftSession>>> {
        self.drafts.read().map_err(|_| {
            CoreError::InternalError {
                message: "Failed to acquire drafts read lock".to_string(),
            }
            .into()
        })
    }

    fn drafts_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<DraftId, DraftSession>>> {
        self.drafts.write().map_err(|_| {
            CoreError::InternalError {
                message: "Failed to acquire drafts write lock".to_string(),
            }
            .into()
        })
    }

    fn matches_read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<MatchId, MatchRecord>>> {
        self.matches.read().map_err(|_| {
            CoreError::InternalError {
                message: "Failed to acquire matches read lock".to_string(),
            }
            .into()
        })
    }

    fn matches_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<MatchId, MatchRecord>>> {
        self.matches.write().map_err(|_| {
            CoreError::InternalError {
                message: "Failed to acquire matches write lock".to_string(),
            }
            .into()
        })
    }
}
