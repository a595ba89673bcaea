//! Stage router: plays the card's stages in order.

use std::io::Write;

use tracing::{info, instrument};
use valentine_content::CardScript;
use valentine_core::event::StageKind;
use valentine_cutscene::domain::screen::Cutscene;
use valentine_gate::domain::screen::Gate;
use valentine_hearts::domain::screen::Hearts;
use valentine_proposal::domain::choice::ChoiceScreen;
use valentine_proposal::domain::proposal::Proposal;
use valentine_timeline::domain::screen::Timeline;

use crate::error::AppError;
use crate::input::InputSource;
use crate::player::{Session, Sky, StageOutcome, play};
use crate::terminal::Console;

/// What happened over a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyReport {
    /// Stages that signalled completion, in order.
    pub completed: Vec<StageKind>,
    /// Whether every listed stage completed.
    pub finished: bool,
    /// Backdrop state at the end.
    pub sky: Sky,
}

/// Plays every stage in `card.stages`. Each screen is built fresh from the
/// card, played to completion and dropped before the next one is built.
///
/// # Errors
///
/// Returns `AppError` if a screen cannot be built or the terminal fails.
#[instrument(skip_all, fields(stages = card.stages.len()))]
pub async fn run<W: Write>(
    card: &CardScript,
    session: &mut Session<'_>,
    input: &mut dyn InputSource,
    console: &mut Console<W>,
) -> Result<JourneyReport, AppError> {
    let mut completed = Vec::with_capacity(card.stages.len());
    let viewport = session.viewport;

    for &stage in &card.stages {
        session.sky.enter(stage);
        info!(%stage, "entering stage");

        let outcome = match stage {
            StageKind::Verification => {
                let mut screen = Gate::verification(card.verification.clone())?;
                play(&mut screen, session, input, console).await?
            }
            StageKind::Puzzle => {
                let mut screen = Gate::puzzle(card.puzzle.clone())?;
                play(&mut screen, session, input, console).await?
            }
            StageKind::Cutscene => {
                let mut screen = Cutscene::new(card.cutscene.clone(), viewport)?;
                play(&mut screen, session, input, console).await?
            }
            StageKind::Timeline => {
                let mut screen = Timeline::new(card.timeline.clone());
                play(&mut screen, session, input, console).await?
            }
            StageKind::Hearts => {
                let mut screen = Hearts::new(card.hearts.clone())?;
                play(&mut screen, session, input, console).await?
            }
            StageKind::Choice => {
                let mut screen = ChoiceScreen::new(card.choice.clone())?;
                play(&mut screen, session, input, console).await?
            }
            StageKind::Proposal => {
                let mut screen = Proposal::new(card.proposal.clone(), viewport)?;
                play(&mut screen, session, input, console).await?
            }
        };

        if outcome == StageOutcome::InputClosed {
            info!(%stage, completed = completed.len(), "journey stopped early");
            return Ok(JourneyReport {
                completed,
                finished: false,
                sky: session.sky,
            });
        }
        completed.push(stage);
    }

    info!("journey finished");
    Ok(JourneyReport {
        completed,
        finished: true,
        sky: session.sky,
    })
}
