//! Timed phase sequencer.
//!
//! A screen's scripted flow is a fixed path of named phases. Each phase is
//! left either a fixed delay after entering it, or a settle delay after the
//! owning screen reports that some sub-task (usually a typewriter reveal) has
//! finished. The sequencer owns at most one pending timer at a time.

use std::fmt;

use crate::error::DomainError;
use crate::scheduler::{Millis, Scheduler, TimerToken};

/// How a phase is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Leave the phase this long after entering it.
    After(Millis),
    /// Leave the phase this long after the owner calls [`Sequencer::signal`].
    OnSignal {
        /// Pause between the signal and the transition.
        settle_ms: Millis,
    },
}

/// One phase of a script and how it is left. The terminal step has no
/// `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<P> {
    /// The phase entered at this step.
    pub phase: P,
    /// How the phase is left; `None` for the terminal phase.
    pub advance: Option<Advance>,
}

impl<P> Step<P> {
    /// A step left after a fixed delay.
    pub const fn after(phase: P, ms: Millis) -> Self {
        Self {
            phase,
            advance: Some(Advance::After(ms)),
        }
    }

    /// A step left `settle_ms` after an external signal.
    pub const fn on_signal(phase: P, settle_ms: Millis) -> Self {
        Self {
            phase,
            advance: Some(Advance::OnSignal { settle_ms }),
        }
    }

    /// The terminal step.
    pub const fn terminal(phase: P) -> Self {
        Self {
            phase,
            advance: None,
        }
    }
}

/// A validated, forward-only phase path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseScript<P> {
    steps: Vec<Step<P>>,
}

impl<P: Copy + PartialEq + fmt::Debug> PhaseScript<P> {
    /// Validates and wraps a list of steps.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if the list is empty, a phase
    /// repeats, a non-final step has no advance, or the final step has one.
    pub fn new(steps: Vec<Step<P>>) -> Result<Self, DomainError> {
        let Some((last, body)) = steps.split_last() else {
            return Err(DomainError::InvalidScript(
                "phase script has no steps".to_owned(),
            ));
        };
        if last.advance.is_some() {
            return Err(DomainError::InvalidScript(format!(
                "final phase {:?} must be terminal",
                last.phase
            )));
        }
        if let Some(step) = body.iter().find(|step| step.advance.is_none()) {
            return Err(DomainError::InvalidScript(format!(
                "phase {:?} is terminal but is not last",
                step.phase
            )));
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|earlier| earlier.phase == step.phase) {
                return Err(DomainError::InvalidScript(format!(
                    "phase {:?} appears more than once",
                    step.phase
                )));
            }
        }
        Ok(Self { steps })
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step<P>] {
        &self.steps
    }

    /// The phases in order.
    pub fn phases(&self) -> impl Iterator<Item = P> + '_ {
        self.steps.iter().map(|step| step.phase)
    }
}

/// Timer key for the step whose exit is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimer {
    step: usize,
}

/// Reported whenever a phase is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entered<P> {
    /// The phase just entered.
    pub phase: P,
    /// Whether it is the final phase of the script.
    pub terminal: bool,
}

/// Drives a [`PhaseScript`] over a [`Scheduler`] owned by the screen.
#[derive(Debug)]
pub struct Sequencer<P> {
    script: PhaseScript<P>,
    index: Option<usize>,
    pending: Option<TimerToken>,
    signalled: bool,
    finished: bool,
}

impl<P: Copy + PartialEq + fmt::Debug> Sequencer<P> {
    /// Creates a sequencer that has not entered any phase yet.
    #[must_use]
    pub fn new(script: PhaseScript<P>) -> Self {
        Self {
            script,
            index: None,
            pending: None,
            signalled: false,
            finished: false,
        }
    }

    /// The active phase, once started.
    #[must_use]
    pub fn current(&self) -> Option<P> {
        self.index.map(|i| self.script.steps[i].phase)
    }

    /// Whether the terminal phase has been entered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the active phase has already received its signal.
    #[must_use]
    pub fn is_signalled(&self) -> bool {
        self.signalled
    }

    /// Enters the first phase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if already started.
    pub fn start<K>(&mut self, timers: &mut Scheduler<K>) -> Result<Entered<P>, DomainError>
    where
        K: From<PhaseTimer> + Clone,
    {
        if self.index.is_some() {
            return Err(DomainError::InvalidTransition(
                "sequence already started".to_owned(),
            ));
        }
        Ok(self.enter(0, timers))
    }

    /// Reports that the active phase's sub-task finished, scheduling the
    /// transition after the phase's settle delay.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the active phase does not
    /// wait for a signal or has already been signalled.
    pub fn signal<K>(&mut self, timers: &mut Scheduler<K>) -> Result<(), DomainError>
    where
        K: From<PhaseTimer> + Clone,
    {
        let Some(index) = self.index else {
            return Err(DomainError::InvalidTransition(
                "sequence not started".to_owned(),
            ));
        };
        let step = &self.script.steps[index];
        match step.advance {
            Some(Advance::OnSignal { settle_ms }) if !self.signalled => {
                self.signalled = true;
                self.pending = Some(timers.schedule(settle_ms, K::from(PhaseTimer { step: index })));
                Ok(())
            }
            Some(Advance::OnSignal { .. }) => Err(DomainError::InvalidTransition(format!(
                "phase {:?} already signalled",
                step.phase
            ))),
            _ => Err(DomainError::InvalidTransition(format!(
                "phase {:?} does not wait for a signal",
                step.phase
            ))),
        }
    }

    /// Handles a fired phase timer. Stale timers (for a step that is no
    /// longer active) are ignored.
    pub fn on_timer<K>(&mut self, timer: PhaseTimer, timers: &mut Scheduler<K>) -> Option<Entered<P>>
    where
        K: From<PhaseTimer> + Clone,
    {
        if self.finished || self.index != Some(timer.step) {
            return None;
        }
        self.pending = None;
        Some(self.enter(timer.step + 1, timers))
    }

    /// Cancels the pending transition, if any.
    pub fn cancel<K: Clone>(&mut self, timers: &mut Scheduler<K>) -> bool {
        self.pending.take().is_some_and(|token| timers.cancel(token))
    }

    fn enter<K>(&mut self, index: usize, timers: &mut Scheduler<K>) -> Entered<P>
    where
        K: From<PhaseTimer> + Clone,
    {
        let step = &self.script.steps[index];
        self.index = Some(index);
        self.signalled = false;
        self.pending = match step.advance {
            Some(Advance::After(ms)) => Some(timers.schedule(ms, K::from(PhaseTimer { step: index }))),
            _ => None,
        };
        let terminal = step.advance.is_none();
        self.finished = terminal;
        Entered {
            phase: step.phase,
            terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        Text,
        Flash,
        Done,
    }

    fn script() -> PhaseScript<Light> {
        PhaseScript::new(vec![
            Step::after(Light::Off, 1_500),
            Step::on_signal(Light::Text, 800),
            Step::after(Light::Flash, 100),
            Step::terminal(Light::Done),
        ])
        .unwrap()
    }

    fn run_until(
        sequencer: &mut Sequencer<Light>,
        timers: &mut Scheduler<PhaseTimer>,
        until: Millis,
    ) -> Vec<(Millis, Entered<Light>)> {
        let mut entered = Vec::new();
        while let Some(fired) = timers.pop_due(until) {
            if let Some(change) = sequencer.on_timer(fired.key, timers) {
                entered.push((fired.due, change));
            }
        }
        timers.settle(until);
        entered
    }

    #[test]
    fn test_script_rejects_empty_and_malformed_paths() {
        assert!(PhaseScript::<Light>::new(vec![]).is_err());
        assert!(PhaseScript::new(vec![Step::after(Light::Off, 1)]).is_err());
        assert!(
            PhaseScript::new(vec![Step::terminal(Light::Off), Step::terminal(Light::Done)])
                .is_err()
        );
        assert!(
            PhaseScript::new(vec![Step::after(Light::Off, 1), Step::terminal(Light::Off)])
                .is_err()
        );
    }

    #[test]
    fn test_visits_every_phase_once_in_order() {
        // Arrange
        let mut timers = Scheduler::new();
        let mut sequencer = Sequencer::new(script());

        // Act
        let first = sequencer.start(&mut timers).unwrap();
        let mut entered = run_until(&mut sequencer, &mut timers, 2_000);
        sequencer.signal(&mut timers).unwrap();
        entered.extend(run_until(&mut sequencer, &mut timers, 10_000));

        // Assert
        assert_eq!(first.phase, Light::Off);
        let phases: Vec<Light> = entered.iter().map(|(_, e)| e.phase).collect();
        assert_eq!(phases, vec![Light::Text, Light::Flash, Light::Done]);
        assert_eq!(entered[0].0, 1_500);
        assert_eq!(entered[1].0, 2_800);
        assert_eq!(entered[2].0, 2_900);
        let terminals = entered.iter().filter(|(_, e)| e.terminal).count();
        assert_eq!(terminals, 1);
        assert!(sequencer.is_finished());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_signal_phase_waits_indefinitely_without_signal() {
        let mut timers = Scheduler::new();
        let mut sequencer = Sequencer::new(script());
        sequencer.start(&mut timers).unwrap();

        run_until(&mut sequencer, &mut timers, 60_000);

        assert_eq!(sequencer.current(), Some(Light::Text));
        assert!(timers.next_deadline().is_none());
    }

    #[test]
    fn test_signal_outside_signal_phase_is_rejected() {
        let mut timers: Scheduler<PhaseTimer> = Scheduler::new();
        let mut sequencer = Sequencer::new(script());

        assert!(sequencer.signal(&mut timers).is_err());
        sequencer.start(&mut timers).unwrap();

        let result = sequencer.signal(&mut timers);

        assert!(matches!(result, Err(DomainError::InvalidTransition(_))));
    }

    #[test]
    fn test_double_signal_is_rejected() {
        let mut timers = Scheduler::new();
        let mut sequencer = Sequencer::new(script());
        sequencer.start(&mut timers).unwrap();
        run_until(&mut sequencer, &mut timers, 1_500);

        sequencer.signal(&mut timers).unwrap();
        let second = sequencer.signal(&mut timers);

        assert!(second.is_err());
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut timers: Scheduler<PhaseTimer> = Scheduler::new();
        let mut sequencer = Sequencer::new(script());

        sequencer.start(&mut timers).unwrap();

        assert!(sequencer.start(&mut timers).is_err());
    }

    #[test]
    fn test_cancel_releases_pending_transition() {
        let mut timers = Scheduler::new();
        let mut sequencer = Sequencer::new(script());
        sequencer.start(&mut timers).unwrap();

        assert!(sequencer.cancel(&mut timers));
        let entered = run_until(&mut sequencer, &mut timers, 10_000);

        assert!(entered.is_empty());
        assert_eq!(sequencer.current(), Some(Light::Off));
    }
}
