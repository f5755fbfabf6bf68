//! Stages of the indexing state machine and the transitions between them

use super::state::PipelineState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the indexing workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Init,
    Scan,
    Analyze,
    PlanStructure,
    Generate,
    Write,
    Store,
    /// Record the current repository and move to the next
    Advance,
    Summarize,
    Finished,
    Failed,
}

impl Stage {
    /// Stages that act on the current repository
    pub fn is_repository_stage(&self) -> bool {
        matches!(
            self,
            Stage::Scan
                | Stage::Analyze
                | Stage::PlanStructure
                | Stage::Generate
                | Stage::Write
                | Stage::Store
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Finished | Stage::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Scan => "scan",
            Stage::Analyze => "analyze",
            Stage::PlanStructure => "plan_structure",
            Stage::Generate => "generate",
            Stage::Write => "write",
            Stage::Store => "store",
            Stage::Advance => "advance",
            Stage::Summarize => "summarize",
            Stage::Finished => "finished",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next stage after `stage` has run against `state`
///
/// A repository stage that recorded an error skips straight to
/// [`Stage::Advance`], so one repository's failure never ends the batch.
/// Cancellation is honored only between repositories.
pub fn transition(stage: Stage, state: &PipelineState, cancelled: bool) -> Stage {
    if stage.is_repository_stage() && state.last_error.is_some() {
        return Stage::Advance;
    }

    match stage {
        Stage::Init if state.repo_paths.is_empty() || cancelled => Stage::Summarize,
        Stage::Init => Stage::Scan,
        Stage::Scan => Stage::Analyze,
        Stage::Analyze => Stage::PlanStructure,
        Stage::PlanStructure => Stage::Generate,
        Stage::Generate => Stage::Write,
        Stage::Write => Stage::Store,
        Stage::Store => Stage::Advance,
        Stage::Advance if cancelled || !state.has_current() => Stage::Summarize,
        Stage::Advance => Stage::Scan,
        Stage::Summarize => Stage::Finished,
        Stage::Finished => Stage::Finished,
        Stage::Failed => Stage::Failed,
    }
}
