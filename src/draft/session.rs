//! Draft session state machine with per-turn quorum voting
//!
//! A session is a value object owned by its caller. Votes are the only
//! mutation path; every rejection is synchronous and side-effect-free, and
//! callers must serialize mutations per session (one mutator at a time).

use crate::config::draft::DraftConfig;
use crate::draft::script::{ScriptStep, TurnScript};
use crate::error::{CoreError, Result};
use crate::types::{DraftAction, DraftId, MapId, MatchCreated, PlayerId, RoomId, TeamSide};
use crate::utils::{current_timestamp, generate_draft_id, generate_match_id, majority_threshold};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Possible states of a draft session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    InProgress,
    Completed,
}

/// A committed turn: the acting team, what it did, and the vote tally that
/// carried the decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftTurn {
    pub team: TeamSide,
    pub action: DraftAction,
    pub map: MapId,
    pub votes: BTreeMap<MapId, usize>,
    pub committed_at: DateTime<Utc>,
}

/// Result of submitting a vote
#[derive(Debug, Clone)]
pub enum VoteOutcome {
    /// Vote recorded but the step stays open until a map reaches quorum
    Waiting {
        tally: BTreeMap<MapId, usize>,
        required: usize,
    },
    /// The step committed and the session moved to the next scripted turn
    Committed {
        turn: DraftTurn,
        next: ScriptStep,
        available_maps: Vec<MapId>,
    },
    /// The session finalized; the match descriptor is ready for the caller
    Finalized {
        final_map: MapId,
        event: MatchCreated,
    },
}

/// Turn-based map elimination/selection session for one room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSession {
    id: DraftId,
    room_id: RoomId,
    team_a: Vec<PlayerId>,
    team_b: Vec<PlayerId>,
    map_pool: Vec<MapId>,
    available_maps: Vec<MapId>,
    script: TurnScript,
    history: Vec<DraftTurn>,
    current_step: usize,
    current_votes: HashMap<PlayerId, MapId>,
    status: DraftStatus,
    final_map: Option<MapId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DraftSession {
    /// Create a session for a room whose roster is already split into teams.
    ///
    /// Rejects configurations whose pool could resolve before the script
    /// finishes (see [`DraftConfig::validate`]).
    pub fn new(
        room_id: RoomId,
        team_a: Vec<PlayerId>,
        team_b: Vec<PlayerId>,
        config: &DraftConfig,
    ) -> Result<Self> {
        config.validate()?;

        let now = current_timestamp();
        Ok(Self {
            id: generate_draft_id(),
            room_id,
            team_a,
            team_b,
            map_pool: config.map_pool.clone(),
            available_maps: config.map_pool.clone(),
            script: config.script.clone(),
            history: Vec::new(),
            current_step: 0,
            current_votes: HashMap::new(),
            status: DraftStatus::InProgress,
            final_map: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn map_pool(&self) -> &[MapId] {
        &self.map_pool
    }

    pub fn available_maps(&self) -> &[MapId] {
        &self.available_maps
    }

    pub fn history(&self) -> &[DraftTurn] {
        &self.history
    }

    pub fn final_map(&self) -> Option<&MapId> {
        self.final_map.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The scripted turn currently due, or `None` once completed
    pub fn expected_action(&self) -> Option<&ScriptStep> {
        match self.status {
            DraftStatus::InProgress => self.script.expected_action(self.current_step),
            DraftStatus::Completed => None,
        }
    }

    /// Uncommitted votes for the step in progress
    pub fn current_votes(&self) -> &HashMap<PlayerId, MapId> {
        &self.current_votes
    }

    fn team_roster(&self, side: TeamSide) -> &[PlayerId] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    /// Submit one player's vote for the current scripted turn.
    ///
    /// A player may re-vote before the step commits; only their latest vote
    /// counts. The step commits as soon as one map gathers
    /// `ceil(team_size / 2)` acting-team votes.
    pub fn submit_vote(
        &mut self,
        team: TeamSide,
        action: DraftAction,
        map: &str,
        player_id: &str,
    ) -> Result<VoteOutcome> {
        if self.status == DraftStatus::Completed {
            return Err(CoreError::DraftCompleted {
                draft_id: self.id.to_string(),
            }
            .into());
        }

        if !self.available_maps.iter().any(|m| m == map) {
            return Err(CoreError::MapUnavailable {
                map: map.to_string(),
            }
            .into());
        }

        let expected = match self.script.expected_action(self.current_step) {
            Some(step) => *step,
            None => {
                // An in-progress session always has a scripted turn left;
                // running out without finalizing means the commit path broke.
                return Err(CoreError::InternalError {
                    message: "draft script exhausted without finalization".to_string(),
                }
                .into());
            }
        };

        if expected.team != team || expected.action != action {
            return Err(CoreError::WrongTurn {
                expected_team: expected.team.to_string(),
                expected_action: expected.action.to_string(),
            }
            .into());
        }

        let acting_team = self.team_roster(team);
        // An empty acting team makes the quorum zero, so any submitted vote
        // carries the turn; membership is only enforceable when a roster
        // exists.
        if !acting_team.is_empty() && !acting_team.iter().any(|p| p == player_id) {
            return Err(CoreError::NotYourTeam {
                player_id: player_id.to_string(),
            }
            .into());
        }

        // Latest vote wins; a below-quorum vote still persists.
        self.current_votes
            .insert(player_id.to_string(), map.to_string());
        self.updated_at = current_timestamp();

        let tally = self.tally_votes();
        let required = majority_threshold(self.team_roster(team).len());
        let (leading, max_votes) = leading_map(&self.available_maps, &tally);

        if max_votes < required {
            debug!(
                draft_id = %self.id,
                step = self.current_step,
                max_votes,
                required,
                "vote recorded, waiting for quorum"
            );
            return Ok(VoteOutcome::Waiting { tally, required });
        }

        self.commit_step(expected, leading, tally)
    }

    fn tally_votes(&self) -> BTreeMap<MapId, usize> {
        let mut tally = BTreeMap::new();
        for map in self.current_votes.values() {
            *tally.entry(map.clone()).or_insert(0) += 1;
        }
        tally
    }

    fn commit_step(
        &mut self,
        step: ScriptStep,
        map: MapId,
        tally: BTreeMap<MapId, usize>,
    ) -> Result<VoteOutcome> {
        let turn = DraftTurn {
            team: step.team,
            action: step.action,
            map: map.clone(),
            votes: tally,
            committed_at: current_timestamp(),
        };
        self.history.push(turn.clone());
        self.available_maps.retain(|m| m != &map);
        self.current_votes.clear();
        self.current_step += 1;

        info!(
            draft_id = %self.id,
            team = %turn.team,
            action = %turn.action,
            map = %turn.map,
            "draft turn committed"
        );

        let script_exhausted = self.current_step >= self.script.len();
        if script_exhausted || self.available_maps.len() == 1 {
            return self.finalize(&turn);
        }

        let next = match self.script.expected_action(self.current_step) {
            Some(step) => *step,
            None => {
                return Err(CoreError::InternalError {
                    message: "draft script exhausted without finalization".to_string(),
                }
                .into());
            }
        };

        Ok(VoteOutcome::Committed {
            turn,
            next,
            available_maps: self.available_maps.clone(),
        })
    }

    fn finalize(&mut self, last_turn: &DraftTurn) -> Result<VoteOutcome> {
        // A committed pick is the selection; otherwise the ban sequence left
        // the decision to the pool, and the first remaining candidate (pool
        // order) is it.
        let final_map = match last_turn.action {
            DraftAction::Pick => last_turn.map.clone(),
            DraftAction::Ban => match self.available_maps.first() {
                Some(map) => map.clone(),
                None => {
                    return Err(CoreError::InternalError {
                        message: "ban sequence exhausted the map pool".to_string(),
                    }
                    .into());
                }
            },
        };

        self.status = DraftStatus::Completed;
        self.final_map = Some(final_map.clone());
        self.updated_at = current_timestamp();

        let event = MatchCreated {
            match_id: generate_match_id(),
            room_id: self.room_id,
            map: final_map.clone(),
            team_a: self.team_a.clone(),
            team_b: self.team_b.clone(),
            timestamp: self.updated_at,
        };

        info!(
            draft_id = %self.id,
            room_id = %self.room_id,
            map = %final_map,
            "draft finalized"
        );

        Ok(VoteOutcome::Finalized { final_map, event })
    }
}

/// Highest-voted available map and its count; ties keep the earliest map in
/// candidate-pool order
fn leading_map(available: &[MapId], tally: &BTreeMap<MapId, usize>) -> (MapId, usize) {
    let mut leading = MapId::new();
    let mut max_votes = 0;
    for map in available {
        let count = tally.get(map).copied().unwrap_or(0);
        if count > max_votes || leading.is_empty() {
            leading = map.clone();
            max_votes = count;
        }
    }
    (leading, max_votes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::utils::generate_room_id;

    fn config_with(pool: &[&str], script: TurnScript) -> DraftConfig {
        DraftConfig {
            map_pool: pool.iter().map(|m| m.to_string()).collect(),
            script,
        }
    }

    fn two_ban_script() -> TurnScript {
        TurnScript::new(vec![
            ScriptStep::new(TeamSide::A, DraftAction::Ban),
            ScriptStep::new(TeamSide::B, DraftAction::Ban),
        ])
    }

    fn players(ids: &[&str]) -> Vec<PlayerId> {
        ids.iter().map(|p| p.to_string()).collect()
    }

    fn standard_session(team_a: &[&str], team_b: &[&str]) -> DraftSession {
        DraftSession::new(
            generate_room_id(),
            players(team_a),
            players(team_b),
            &DraftConfig::default(),
        )
        .unwrap()
    }

    fn core_error(result: Result<VoteOutcome>) -> CoreError {
        let err = result.unwrap_err();
        err.downcast::<CoreError>().unwrap()
    }

    #[test]
    fn test_session_creation() {
        let session = standard_session(&["p1", "p2"], &["p3", "p4"]);
        assert_eq!(session.status(), DraftStatus::InProgress);
        assert_eq!(session.available_maps().len(), 7);
        assert_eq!(session.current_step(), 0);
        assert!(session.final_map().is_none());
        assert!(session.history().is_empty());

        let expected = session.expected_action().unwrap();
        assert_eq!(expected.team, TeamSide::A);
        assert_eq!(expected.action, DraftAction::Ban);
    }

    #[test]
    fn test_creation_rejects_undersized_pool() {
        let config = config_with(&["dust2"], two_ban_script());
        let result = DraftSession::new(
            generate_room_id(),
            players(&["p1"]),
            players(&["p2"]),
            &config,
        );
        assert!(result.is_err());

        // Pool of exactly script length is also unresolvable.
        let config = config_with(&["dust2", "mirage"], two_ban_script());
        let result = DraftSession::new(
            generate_room_id(),
            players(&["p1"]),
            players(&["p2"]),
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_turn_rejected_without_mutation() {
        let mut session = standard_session(&["p1", "p2"], &["p3", "p4"]);

        // Team B may not act first, and picks are not due yet.
        let err = core_error(session.submit_vote(TeamSide::B, DraftAction::Ban, "mirage", "p3"));
        assert!(matches!(err, CoreError::WrongTurn { .. }));
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = core_error(session.submit_vote(TeamSide::A, DraftAction::Pick, "mirage", "p1"));
        assert!(matches!(err, CoreError::WrongTurn { .. }));

        assert_eq!(session.current_step(), 0);
        assert!(session.history().is_empty());
        assert!(session.current_votes().is_empty());
        assert_eq!(session.available_maps().len(), 7);
    }

    #[test]
    fn test_unavailable_map_rejected_without_mutation() {
        let mut session = standard_session(&["p1", "p2"], &["p3", "p4"]);

        let err = core_error(session.submit_vote(TeamSide::A, DraftAction::Ban, "vertigo", "p1"));
        assert!(matches!(err, CoreError::MapUnavailable { .. }));
        assert!(session.current_votes().is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_non_member_vote_rejected() {
        let mut session = standard_session(&["p1", "p2"], &["p3", "p4"]);

        let err = core_error(session.submit_vote(TeamSide::A, DraftAction::Ban, "mirage", "p3"));
        assert!(matches!(err, CoreError::NotYourTeam { .. }));
        assert!(session.current_votes().is_empty());
    }

    #[test]
    fn test_single_vote_commits_with_two_player_team() {
        // Two-player team: quorum is one vote.
        let mut session = standard_session(&["p1", "p2"], &["p3", "p4"]);

        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Ban, "inferno", "p1")
            .unwrap();

        match outcome {
            VoteOutcome::Committed {
                turn,
                next,
                available_maps,
            } => {
                assert_eq!(turn.map, "inferno");
                assert_eq!(turn.action, DraftAction::Ban);
                assert_eq!(turn.votes.get("inferno"), Some(&1));
                assert_eq!(next.team, TeamSide::B);
                assert_eq!(available_maps.len(), 6);
                assert!(!available_maps.contains(&"inferno".to_string()));
            }
            other => panic!("expected commit, got {:?}", other),
        }

        assert_eq!(session.current_step(), 1);
        assert!(session.current_votes().is_empty());
    }

    #[test]
    fn test_quorum_waits_and_vote_overwrite() {
        // Three-player team: quorum is two votes.
        let mut session = standard_session(&["p1", "p2", "p3"], &["p4", "p5", "p6"]);

        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Ban, "nuke", "p1")
            .unwrap();
        match outcome {
            VoteOutcome::Waiting { tally, required } => {
                assert_eq!(required, 2);
                assert_eq!(tally.get("nuke"), Some(&1));
            }
            other => panic!("expected waiting, got {:?}", other),
        }
        // The insufficient vote is still recorded.
        assert_eq!(session.current_votes().len(), 1);

        // Split votes stay below quorum.
        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Ban, "mirage", "p2")
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::Waiting { .. }));

        // p1 changes their mind; latest vote counts and mirage reaches two.
        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Ban, "mirage", "p1")
            .unwrap();
        match outcome {
            VoteOutcome::Committed { turn, .. } => {
                assert_eq!(turn.map, "mirage");
                assert_eq!(turn.votes.get("mirage"), Some(&2));
                assert_eq!(turn.votes.get("nuke"), None);
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_two_ban_script_finalizes_on_last_map() {
        // Pool [dust2, mirage, nuke] with bans only: after A bans dust2 and
        // B bans mirage a single candidate remains and the session
        // finalizes with it.
        let config = config_with(&["dust2", "mirage", "nuke"], two_ban_script());
        let mut session = DraftSession::new(
            generate_room_id(),
            players(&["p1"]),
            players(&["p2"]),
            &config,
        )
        .unwrap();

        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Ban, "dust2", "p1")
            .unwrap();
        match outcome {
            VoteOutcome::Committed { available_maps, .. } => {
                assert_eq!(available_maps, vec!["mirage".to_string(), "nuke".to_string()]);
            }
            other => panic!("expected commit, got {:?}", other),
        }

        let outcome = session
            .submit_vote(TeamSide::B, DraftAction::Ban, "mirage", "p2")
            .unwrap();
        match outcome {
            VoteOutcome::Finalized { final_map, event } => {
                assert_eq!(final_map, "nuke");
                assert_eq!(event.map, "nuke");
                assert_eq!(event.team_a, players(&["p1"]));
                assert_eq!(event.team_b, players(&["p2"]));
            }
            other => panic!("expected finalization, got {:?}", other),
        }

        assert_eq!(session.status(), DraftStatus::Completed);
        assert_eq!(session.final_map(), Some(&"nuke".to_string()));
        assert!(session.expected_action().is_none());
    }

    #[test]
    fn test_standard_draft_finalizes_on_pick() {
        let mut session = standard_session(&["p1", "p2"], &["p3", "p4"]);

        session
            .submit_vote(TeamSide::A, DraftAction::Ban, "inferno", "p1")
            .unwrap();
        session
            .submit_vote(TeamSide::B, DraftAction::Ban, "mirage", "p3")
            .unwrap();
        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Pick, "dust2", "p2")
            .unwrap();

        match outcome {
            VoteOutcome::Finalized { final_map, event } => {
                assert_eq!(final_map, "dust2");
                assert_eq!(event.room_id, session.room_id());
            }
            other => panic!("expected finalization, got {:?}", other),
        }

        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history()[2].action, DraftAction::Pick);
        // The pick is consumed from the pool as well.
        assert!(!session
            .available_maps()
            .contains(&"dust2".to_string()));
    }

    #[test]
    fn test_completed_session_rejects_votes() {
        let config = config_with(&["dust2", "mirage", "nuke"], two_ban_script());
        let mut session = DraftSession::new(
            generate_room_id(),
            players(&["p1"]),
            players(&["p2"]),
            &config,
        )
        .unwrap();

        session
            .submit_vote(TeamSide::A, DraftAction::Ban, "dust2", "p1")
            .unwrap();
        session
            .submit_vote(TeamSide::B, DraftAction::Ban, "mirage", "p2")
            .unwrap();

        let err = core_error(session.submit_vote(TeamSide::A, DraftAction::Ban, "nuke", "p1"));
        assert!(matches!(err, CoreError::DraftCompleted { .. }));
        assert_eq!(err.category(), ErrorCategory::State);
    }

    #[test]
    fn test_empty_acting_team_commits_on_first_vote() {
        // Quorum over an empty roster is zero, so the first vote carries the
        // turn regardless of who submits it.
        let mut session = standard_session(&[], &["p3", "p4"]);

        let outcome = session
            .submit_vote(TeamSide::A, DraftAction::Ban, "ancient", "p3")
            .unwrap();
        assert!(matches!(outcome, VoteOutcome::Committed { .. }));
        assert_eq!(session.current_step(), 1);
    }

    #[test]
    fn test_leading_map_tie_breaks_by_pool_order() {
        let available: Vec<MapId> = vec![
            "dust2".to_string(),
            "mirage".to_string(),
            "nuke".to_string(),
        ];
        let mut tally = BTreeMap::new();
        tally.insert("mirage".to_string(), 2);
        tally.insert("nuke".to_string(), 2);

        // BTreeMap order would put mirage first alphabetically anyway; make
        // the pool order disagree with the alphabetical order to prove the
        // pool wins.
        let reordered: Vec<MapId> = vec![
            "nuke".to_string(),
            "mirage".to_string(),
            "dust2".to_string(),
        ];
        let (map, votes) = leading_map(&reordered, &tally);
        assert_eq!(map, "nuke");
        assert_eq!(votes, 2);

        let (map, _) = leading_map(&available, &tally);
        assert_eq!(map, "mirage");
    }

    #[test]
    fn test_vote_for_banned_map_rejected() {
        let mut session = standard_session(&["p1", "p2"], &["p3", "p4"]);

        session
            .submit_vote(TeamSide::A, DraftAction::Ban, "inferno", "p1")
            .unwrap();

        let err = core_error(session.submit_vote(TeamSide::B, DraftAction::Ban, "inferno", "p3"));
        assert!(matches!(err, CoreError::MapUnavailable { .. }));
    }
}
