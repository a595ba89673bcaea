//! The choice screen.

use tracing::{debug, info, instrument};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{EventMetadata, StageKind};
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::{Millis, Scheduler};
use valentine_core::screen::Screen;

use crate::domain::events::{ChoiceEvent, ChoiceEventKind};
use crate::domain::script::{ChoiceScript, ChoiceStep};

/// Player input on the choice screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceInput {
    /// Press the button at this index on the current step.
    Choose(usize),
}

/// Timer keys on the choice screen's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceTimer {
    /// Hide the result and move on.
    ResultDone,
    /// Complete the stage.
    Complete,
}

/// One or more decision steps.
#[derive(Debug)]
pub struct ChoiceScreen {
    script: ChoiceScript,
    step: usize,
    result: Option<String>,
    timers: Scheduler<ChoiceTimer>,
    finishing: bool,
    mounted: bool,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<ChoiceEvent>,
}

impl ChoiceScreen {
    /// Builds an unmounted choice screen on its first step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if a step cannot be left.
    pub fn new(script: ChoiceScript) -> Result<Self, DomainError> {
        script.validate()?;
        Ok(Self {
            script,
            step: 0,
            result: None,
            timers: Scheduler::new(),
            finishing: false,
            mounted: false,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// The current step.
    #[must_use]
    pub fn current_step(&self) -> Option<&ChoiceStep> {
        self.script.steps.get(self.step)
    }

    /// Index of the current step.
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step
    }

    /// The result currently shown.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// The hint, shown under the last step while no result is up.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        (self.is_last_step() && self.result.is_none() && !self.completed)
            .then_some(self.script.hint.as_str())
    }

    fn is_last_step(&self) -> bool {
        self.step + 1 >= self.script.steps.len()
    }

    fn choose(&mut self, index: usize, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.result.is_some() || self.finishing {
            return Err(DomainError::InvalidTransition(
                "a result is still showing".to_owned(),
            ));
        }
        let step = self
            .script
            .steps
            .get(self.step)
            .ok_or_else(|| DomainError::InvalidTransition("no step is showing".to_owned()))?;
        let button = step.buttons.get(index).ok_or_else(|| {
            DomainError::Validation(format!(
                "button {index} is out of range ({} buttons)",
                step.buttons.len()
            ))
        })?;
        debug!(step = self.step, button = index, "choice made");

        if let Some(text) = button.result.clone() {
            self.result = Some(text.clone());
            self.timers.schedule(self.script.result_ms, ChoiceTimer::ResultDone);
            self.record(ChoiceEventKind::ResultShown { text }, clock);
        } else {
            self.advance(clock);
        }
        Ok(())
    }

    fn advance(&mut self, clock: &dyn Clock) {
        if self.is_last_step() {
            self.complete(clock);
        } else {
            self.step += 1;
            self.show_step(clock);
        }
    }

    fn show_step(&mut self, clock: &dyn Clock) {
        if let Some(step) = self.script.steps.get(self.step) {
            let text = step.text.clone();
            self.record(
                ChoiceEventKind::StepShown {
                    step: self.step,
                    text,
                },
                clock,
            );
        }
    }

    fn complete(&mut self, clock: &dyn Clock) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.timers.cancel_all();
        info!("choice completed");
        self.record(ChoiceEventKind::StageCompleted, clock);
    }

    fn on_timer(&mut self, key: ChoiceTimer, clock: &dyn Clock) {
        match key {
            ChoiceTimer::ResultDone => {
                self.result = None;
                self.record(ChoiceEventKind::ResultHidden, clock);
                if self.is_last_step() {
                    self.finishing = true;
                    self.timers
                        .schedule(self.script.final_delay_ms, ChoiceTimer::Complete);
                } else {
                    self.step += 1;
                    self.show_step(clock);
                }
            }
            ChoiceTimer::Complete => self.complete(clock),
        }
    }

    fn record(&mut self, kind: ChoiceEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            StageKind::Choice,
            self.next_sequence_number(),
            self.timers.now(),
            clock,
        );
        self.uncommitted_events.push(ChoiceEvent { metadata, kind });
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }
}

impl Screen for ChoiceScreen {
    type Input = ChoiceInput;
    type Event = ChoiceEvent;

    fn stage(&self) -> StageKind {
        StageKind::Choice
    }

    #[instrument(skip_all)]
    fn mount(&mut self, clock: &dyn Clock, _rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if self.mounted {
            return Err(DomainError::InvalidTransition("choice already mounted".to_owned()));
        }
        self.mounted = true;
        self.show_step(clock);
        Ok(())
    }

    fn handle(
        &mut self,
        input: ChoiceInput,
        clock: &dyn Clock,
        _rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        if !self.mounted || self.completed {
            return Err(DomainError::InvalidTransition(
                "choice is not accepting input".to_owned(),
            ));
        }
        let ChoiceInput::Choose(index) = input;
        self.choose(index, clock)
    }

    fn now(&self) -> Millis {
        self.timers.now()
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    fn advance_to(&mut self, until: Millis, clock: &dyn Clock, _rng: &mut dyn DeterministicRng) {
        while let Some(fired) = self.timers.pop_due(until) {
            self.on_timer(fired.key, clock);
        }
        self.timers.settle(until);
    }

    fn uncommitted_events(&self) -> &[ChoiceEvent] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn clear_uncommitted_events(&mut self) {
        self.version += self.uncommitted_events.len() as i64;
        self.uncommitted_events.clear();
    }

    fn is_complete(&self) -> bool {
        self.completed
    }

    fn teardown(&mut self) -> usize {
        self.timers.cancel_all()
    }
}
