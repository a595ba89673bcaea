//! Drives one screen against virtual time and terminal input.

use std::io::Write;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{DomainEvent, StageKind, StageSignal};
use valentine_core::geometry::Viewport;
use valentine_core::rng::DeterministicRng;
use valentine_core::screen::Screen;

use crate::error::AppError;
use crate::input::InputSource;
use crate::pace::Pace;
use crate::terminal::{Console, Frame, Interactive};

/// Decorative backdrop state that outlives individual stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sky {
    /// The star field is showing.
    pub stars: bool,
    /// The star field has turned pink.
    pub pink: bool,
}

impl Sky {
    /// Pink stars belong to the proposal only.
    pub fn enter(&mut self, stage: StageKind) {
        if stage != StageKind::Proposal {
            self.pink = false;
        }
    }

    fn apply(&mut self, signal: StageSignal) {
        match signal {
            StageSignal::StarsStart => self.stars = true,
            StageSignal::PinkStarsStart => self.pink = true,
            StageSignal::Complete => {}
        }
    }
}

/// Everything a screen needs from its surroundings.
pub struct Session<'a> {
    /// Wall clock for event timestamps.
    pub clock: &'a dyn Clock,
    /// Randomness for delays and placement.
    pub rng: &'a mut dyn DeterministicRng,
    /// Virtual-to-real time mapping.
    pub pace: Pace,
    /// Screen geometry.
    pub viewport: Viewport,
    /// Backdrop state.
    pub sky: Sky,
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The screen signalled completion.
    Completed,
    /// Input ran out while the screen still needed it.
    InputClosed,
}

/// Mounts `screen` and plays it until it completes or input runs out.
///
/// Pending timers win over input when both are ready, so an instant pace
/// plays every scripted beat before the next line is read.
///
/// # Errors
///
/// Returns `AppError` if mounting fails or the terminal cannot be read or
/// written. Refused input is reported on the console instead.
#[instrument(skip_all, fields(stage = %screen.stage()))]
pub async fn play<S, W>(
    screen: &mut S,
    session: &mut Session<'_>,
    input: &mut dyn InputSource,
    console: &mut Console<W>,
) -> Result<StageOutcome, AppError>
where
    S: Interactive,
    W: Write,
{
    screen.mount(session.clock, session.rng)?;
    info!("stage started");

    let mut input_open = true;
    let mut last_prompt: Option<String> = None;

    loop {
        drain(screen, &mut session.sky, console)?;
        if screen.is_complete() {
            let cancelled = screen.teardown();
            info!(cancelled, at_ms = screen.now(), "stage completed");
            return Ok(StageOutcome::Completed);
        }

        let deadline = screen.next_deadline();
        if deadline.is_none() && !input_open {
            let cancelled = screen.teardown();
            warn!(cancelled, "input closed before the stage completed");
            return Ok(StageOutcome::InputClosed);
        }

        let prompt = screen.prompt();
        if prompt != last_prompt {
            if let Some(text) = &prompt {
                console.prompt(text)?;
            }
        }
        last_prompt = prompt;

        let wait = deadline.map(|due| session.pace.real_delay(due.saturating_sub(screen.now())));
        let waiting_since = Instant::now();

        tokio::select! {
            biased;
            () = sleep(wait.unwrap_or_default()), if wait.is_some() => {
                if let Some(due) = deadline {
                    screen.advance_to(due, session.clock, session.rng);
                }
            }
            line = input.next_line(), if input_open => {
                let elapsed = session.pace.virtual_elapsed(waiting_since.elapsed());
                if elapsed > 0 {
                    let until = screen.now().saturating_add(elapsed);
                    screen.advance_to(until, session.clock, session.rng);
                }
                match line? {
                    Some(line) => apply_line(screen, session, console, &line)?,
                    None => {
                        debug!("input exhausted");
                        input_open = false;
                    }
                }
            }
        }
    }
}

fn apply_line<S, W>(
    screen: &mut S,
    session: &mut Session<'_>,
    console: &mut Console<W>,
    line: &str,
) -> Result<(), AppError>
where
    S: Interactive,
    W: Write,
{
    let inputs = match screen.parse(line) {
        Ok(inputs) => inputs,
        Err(hint) => {
            console.show(Frame::Line(hint))?;
            return Ok(());
        }
    };
    for input in inputs {
        match screen.handle(input, session.clock, session.rng) {
            Ok(()) => {}
            // The screen records its own rejection event.
            Err(DomainError::ValidationMismatch) => break,
            Err(error) => {
                debug!(%error, "input refused");
                console.show(Frame::Line(format!("({error})")))?;
                break;
            }
        }
    }
    Ok(())
}

fn drain<S, W>(screen: &mut S, sky: &mut Sky, console: &mut Console<W>) -> Result<(), AppError>
where
    S: Interactive,
    W: Write,
{
    for event in screen.take_events() {
        let metadata = event.metadata();
        debug!(
            event_type = event.event_type(),
            sequence_number = metadata.sequence_number,
            at_ms = metadata.at_ms,
            payload = %event.to_payload(),
            "event recorded"
        );
        if let Some(signal) = event.signal() {
            info!(?signal, "stage signal");
            sky.apply(signal);
        }
        for frame in screen.render(&event) {
            console.show(frame)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use valentine_gate::domain::screen::Gate;
    use valentine_gate::domain::script::GateScript;
    use valentine_test_support::{MockRng, fixed_clock};

    use super::*;
    use crate::input::ScriptedInput;

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_wrong_answer_is_shown_and_retry_unlocks() {
        // Arrange
        let clock = fixed_clock();
        let mut rng = MockRng;
        let mut session = Session {
            clock: &clock,
            rng: &mut rng,
            pace: Pace::Instant,
            viewport: Viewport::default(),
            sky: Sky::default(),
        };
        let mut gate = Gate::puzzle(GateScript::puzzle()).unwrap();
        let mut input = ScriptedInput::new(["sweetie", "Princess"]);
        let mut console = Console::new(Vec::new());

        // Act
        let outcome = play(&mut gate, &mut session, &mut input, &mut console)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome, StageOutcome::Completed);
        let printed = output(console);
        assert!(printed.contains("Not quite... try again! ❌"));
        assert!(printed.contains("🔓"));
        assert_eq!(gate.next_deadline(), None);
    }

    #[tokio::test]
    async fn test_closed_input_stops_a_waiting_stage() {
        let clock = fixed_clock();
        let mut rng = MockRng;
        let mut session = Session {
            clock: &clock,
            rng: &mut rng,
            pace: Pace::Instant,
            viewport: Viewport::default(),
            sky: Sky::default(),
        };
        let mut gate = Gate::puzzle(GateScript::puzzle()).unwrap();
        let mut input = ScriptedInput::new(["nope"]);
        let mut console = Console::new(Vec::new());

        let outcome = play(&mut gate, &mut session, &mut input, &mut console)
            .await
            .unwrap();

        assert_eq!(outcome, StageOutcome::InputClosed);
        assert!(!gate.is_complete());
    }

    #[test]
    fn test_pink_stars_reset_outside_the_proposal() {
        let mut sky = Sky::default();
        sky.apply(StageSignal::StarsStart);
        sky.apply(StageSignal::PinkStarsStart);

        sky.enter(StageKind::Proposal);
        assert!(sky.pink);
        sky.enter(StageKind::Timeline);

        assert!(!sky.pink);
        assert!(sky.stars);
    }
}
