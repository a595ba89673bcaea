//! The card script document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use valentine_core::error::DomainError;
use valentine_core::event::StageKind;
use valentine_cutscene::domain::script::CutsceneScript;
use valentine_gate::domain::script::GateScript;
use valentine_hearts::domain::script::HeartsScript;
use valentine_proposal::domain::script::{ChoiceScript, ProposalScript};
use valentine_timeline::domain::memory::TimelineScript;

/// Every stage's configuration plus the order they are played in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardScript {
    /// Stages in play order.
    pub stages: Vec<StageKind>,
    /// The identity check.
    pub verification: GateScript,
    /// The nickname puzzle.
    pub puzzle: GateScript,
    /// The lights-out cutscene.
    pub cutscene: CutsceneScript,
    /// The memory timeline.
    pub timeline: TimelineScript,
    /// The heart-catching game.
    pub hearts: HeartsScript,
    /// The choice screen.
    pub choice: ChoiceScript,
    /// The proposal.
    pub proposal: ProposalScript,
}

impl Default for CardScript {
    fn default() -> Self {
        Self {
            stages: vec![
                StageKind::Verification,
                StageKind::Cutscene,
                StageKind::Timeline,
                StageKind::Hearts,
                StageKind::Choice,
                StageKind::Proposal,
            ],
            verification: GateScript::verification(),
            puzzle: GateScript::puzzle(),
            cutscene: CutsceneScript::default(),
            timeline: TimelineScript::default(),
            hearts: HeartsScript::default(),
            choice: ChoiceScript::default(),
            proposal: ProposalScript::default(),
        }
    }
}

impl CardScript {
    /// Checks the stage list and every stage that will be played.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if no stages are listed, a stage
    /// repeats, or a listed stage's own script is unplayable.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.stages.is_empty() {
            return Err(DomainError::InvalidScript("card has no stages".to_owned()));
        }
        let mut seen = HashSet::new();
        for &stage in &self.stages {
            if !seen.insert(stage) {
                return Err(DomainError::InvalidScript(format!(
                    "stage {stage} appears more than once"
                )));
            }
            self.validate_stage(stage).map_err(|error| {
                DomainError::InvalidScript(format!("stage {stage}: {error}"))
            })?;
        }
        if self.stages.last() != Some(&StageKind::Proposal) {
            warn!("card does not end with the proposal");
        }
        Ok(())
    }

    fn validate_stage(&self, stage: StageKind) -> Result<(), DomainError> {
        match stage {
            StageKind::Verification => self.verification.validate(),
            StageKind::Puzzle => self.puzzle.validate(),
            StageKind::Cutscene => self.cutscene.validate(),
            StageKind::Timeline => {
                if self.timeline.memories.is_empty() {
                    warn!("timeline has no memories");
                }
                Ok(())
            }
            StageKind::Hearts => self.hearts.validate(),
            StageKind::Choice => self.choice.validate(),
            StageKind::Proposal => self.proposal.validate(),
        }
    }
}
