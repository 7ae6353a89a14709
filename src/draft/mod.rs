//! Map draft protocol: turn scripts and quorum-voted ban/pick sessions
//!
//! A draft session walks a fixed alternating script of team turns over a
//! candidate map pool. Each turn commits once a majority of the acting team
//! converges on one map; the session finalizes when the script is exhausted
//! or a single candidate remains.

pub mod script;
pub mod session;

// Re-export commonly used types
pub use script::{ScriptStep, TurnScript};
pub use session::{DraftSession, DraftStatus, DraftTurn, VoteOutcome};
