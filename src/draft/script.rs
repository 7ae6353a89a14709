//! Fixed turn scripts for draft sessions

use crate::types::{DraftAction, TeamSide};
use serde::{Deserialize, Serialize};

/// One scripted turn: which team acts and what they do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub team: TeamSide,
    pub action: DraftAction,
}

impl ScriptStep {
    pub fn new(team: TeamSide, action: DraftAction) -> Self {
        Self { team, action }
    }
}

impl std::fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team {} {}", self.team, self.action)
    }
}

/// Ordered sequence of scripted turns a session works through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnScript {
    steps: Vec<ScriptStep>,
}

impl TurnScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// The standard short veto: A ban, B ban, A pick
    pub fn standard() -> Self {
        Self::new(vec![
            ScriptStep::new(TeamSide::A, DraftAction::Ban),
            ScriptStep::new(TeamSide::B, DraftAction::Ban),
            ScriptStep::new(TeamSide::A, DraftAction::Pick),
        ])
    }

    /// The turn due at `step`, or `None` once the script is exhausted
    pub fn expected_action(&self, step: usize) -> Option<&ScriptStep> {
        self.steps.get(step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

impl Default for TurnScript {
    fn default() -> Self {
        Self::standard()
    }
}
