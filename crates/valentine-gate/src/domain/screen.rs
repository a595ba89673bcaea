//! The gate screen.

use std::collections::HashMap;

use tracing::{debug, info, instrument};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{EventMetadata, StageKind};
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::{Millis, Scheduler, TimerToken};
use valentine_core::screen::Screen;
use valentine_core::sequencer::{PhaseScript, PhaseTimer, Sequencer, Step};

use crate::domain::events::{GateEvent, GateEventKind};
use crate::domain::script::{GateScript, Question};

/// Phases of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Waiting for correct answers; left on unlock after the fade.
    Locked,
    /// Faded out; terminal.
    Unlocked,
}

/// Player input on a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateInput {
    /// Set one field.
    Answer {
        /// Question id.
        question_id: String,
        /// Raw field value.
        value: String,
    },
    /// Submit the form.
    Submit,
}

/// Timer keys on a gate's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTimer {
    /// Leave the current phase.
    Phase(PhaseTimer),
    /// Hide the rejection message.
    ClearError,
}

impl From<PhaseTimer> for GateTimer {
    fn from(timer: PhaseTimer) -> Self {
        Self::Phase(timer)
    }
}

/// A form of questions that stays locked until every answer matches.
#[derive(Debug)]
pub struct Gate {
    stage: StageKind,
    script: GateScript,
    answers: HashMap<String, String>,
    timers: Scheduler<GateTimer>,
    sequencer: Sequencer<GatePhase>,
    error: Option<String>,
    clear_error: Option<TimerToken>,
    mounted: bool,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<GateEvent>,
}

impl Gate {
    /// Builds an unmounted gate reporting as `stage`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if the script cannot be unlocked.
    pub fn new(stage: StageKind, script: GateScript) -> Result<Self, DomainError> {
        script.validate()?;
        let phases = PhaseScript::new(vec![
            Step::on_signal(GatePhase::Locked, script.unlock_delay_ms),
            Step::terminal(GatePhase::Unlocked),
        ])?;
        Ok(Self {
            stage,
            script,
            answers: HashMap::new(),
            timers: Scheduler::new(),
            sequencer: Sequencer::new(phases),
            error: None,
            clear_error: None,
            mounted: false,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// The four-question verification gate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if the script cannot be unlocked.
    pub fn verification(script: GateScript) -> Result<Self, DomainError> {
        Self::new(StageKind::Verification, script)
    }

    /// The single-question puzzle gate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if the script cannot be unlocked.
    pub fn puzzle(script: GateScript) -> Result<Self, DomainError> {
        Self::new(StageKind::Puzzle, script)
    }

    /// The gate's script.
    #[must_use]
    pub fn script(&self) -> &GateScript {
        &self.script
    }

    /// The questions, in display order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.script.questions
    }

    /// The recorded value for a question.
    #[must_use]
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// The rejection message currently shown.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the gate has accepted the answers and is fading out.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.sequencer.is_signalled() || self.sequencer.is_finished()
    }

    fn record_answer(&mut self, question_id: &str, value: &str, clock: &dyn Clock) -> Result<(), DomainError> {
        let question = self
            .script
            .question(question_id)
            .ok_or_else(|| DomainError::Validation(format!("unknown question {question_id:?}")))?;
        let normalized = question.kind.normalize(value);
        self.answers.insert(question_id.to_owned(), normalized);
        self.record(
            GateEventKind::AnswerRecorded {
                question_id: question_id.to_owned(),
            },
            clock,
        );
        Ok(())
    }

    fn submit(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        if let Some(token) = self.clear_error.take() {
            self.timers.cancel(token);
        }
        self.error = None;

        let all_correct = self.script.questions.iter().all(|question| {
            question.accepts(self.answers.get(&question.id).map_or("", String::as_str))
        });

        if !all_correct {
            debug!(stage = %self.stage, "answers rejected");
            let message = self.script.error_message.clone();
            self.error = Some(message.clone());
            self.clear_error = Some(
                self.timers
                    .schedule(self.script.error_clear_ms, GateTimer::ClearError),
            );
            self.record(
                GateEventKind::AnswersRejected { message },
                clock,
            );
            return Err(DomainError::ValidationMismatch);
        }

        self.sequencer.signal(&mut self.timers)?;
        info!(stage = %self.stage, "gate unlocked");
        self.record(GateEventKind::GateUnlocked, clock);
        Ok(())
    }

    fn on_timer(&mut self, key: GateTimer, clock: &dyn Clock) {
        match key {
            GateTimer::ClearError => {
                self.clear_error = None;
                if self.error.take().is_some() {
                    self.record(GateEventKind::ErrorCleared, clock);
                }
            }
            GateTimer::Phase(timer) => {
                let Some(entered) = self.sequencer.on_timer(timer, &mut self.timers) else {
                    return;
                };
                if entered.terminal && !self.completed {
                    self.completed = true;
                    self.timers.cancel_all();
                    info!(stage = %self.stage, "gate completed");
                    self.record(GateEventKind::StageCompleted, clock);
                }
            }
        }
    }

    fn record(&mut self, kind: GateEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            self.stage,
            self.next_sequence_number(),
            self.timers.now(),
            clock,
        );
        self.uncommitted_events.push(GateEvent { metadata, kind });
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }
}

impl Screen for Gate {
    type Input = GateInput;
    type Event = GateEvent;

    fn stage(&self) -> StageKind {
        self.stage
    }

    #[instrument(skip_all, fields(stage = %self.stage))]
    fn mount(&mut self, clock: &dyn Clock, _rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if self.mounted {
            return Err(DomainError::InvalidTransition("gate already mounted".to_owned()));
        }
        self.mounted = true;
        self.sequencer.start(&mut self.timers)?;
        self.record(
            GateEventKind::Presented {
                questions: self.script.questions.len(),
            },
            clock,
        );
        Ok(())
    }

    /// Wrong answers record `AnswersRejected` and then return
    /// `DomainError::ValidationMismatch`; drain events either way.
    fn handle(
        &mut self,
        input: GateInput,
        clock: &dyn Clock,
        _rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        if !self.mounted {
            return Err(DomainError::InvalidTransition("gate not mounted".to_owned()));
        }
        if self.is_unlocked() {
            return Err(DomainError::InvalidTransition("gate already unlocked".to_owned()));
        }
        match input {
            GateInput::Answer { question_id, value } => self.record_answer(&question_id, &value, clock),
            GateInput::Submit => self.submit(clock),
        }
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

    fn uncommitted_events(&self) -> &[GateEvent] {
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
        self.clear_error = None;
        self.timers.cancel_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::event::{DomainEvent, StageSignal};
    use valentine_test_support::{MockRng, fixed_clock};

    fn mounted(script: GateScript) -> Gate {
        let mut gate = Gate::verification(script).unwrap();
        gate.mount(&fixed_clock(), &mut MockRng).unwrap();
        gate.clear_uncommitted_events();
        gate
    }

    fn answer(gate: &mut Gate, id: &str, value: &str) {
        gate.handle(
            GateInput::Answer {
                question_id: id.to_owned(),
                value: value.to_owned(),
            },
            &fixed_clock(),
            &mut MockRng,
        )
        .unwrap();
    }

    fn fill(gate: &mut Gate, flower: &str) {
        answer(gate, "color", "Red");
        answer(gate, "birthday", "2007-07-06");
        answer(gate, "flower", flower);
        answer(gate, "lastName", "Madnick");
    }

    fn submit(gate: &mut Gate) -> Result<(), DomainError> {
        gate.handle(GateInput::Submit, &fixed_clock(), &mut MockRng)
    }

    fn advance(gate: &mut Gate, until: Millis) {
        gate.advance_to(until, &fixed_clock(), &mut MockRng);
    }

    #[test]
    fn test_correct_answers_unlock_after_fade() {
        // Arrange
        let mut gate = mounted(GateScript::verification());
        fill(&mut gate, "PANZIE");

        // Act
        submit(&mut gate).unwrap();
        advance(&mut gate, 999);
        let before_fade = gate.is_complete();
        advance(&mut gate, 1_000);

        // Assert
        assert!(!before_fade);
        assert!(gate.is_complete());
        let events = gate.take_events();
        let completions = events
            .iter()
            .filter(|e| e.signal() == Some(StageSignal::Complete))
            .count();
        assert_eq!(completions, 1);
        let completed = events.last().unwrap();
        assert!(matches!(completed.kind, GateEventKind::StageCompleted));
        assert_eq!(completed.metadata.at_ms, 1_000);
    }

    #[test]
    fn test_one_wrong_answer_rejects_whole_form() {
        let mut gate = mounted(GateScript::verification());
        fill(&mut gate, "rose");

        let result = submit(&mut gate);

        assert_eq!(result, Err(DomainError::ValidationMismatch));
        assert_eq!(gate.error(), Some(GateScript::verification().error_message.as_str()));
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_missing_answer_is_a_mismatch() {
        let mut gate = mounted(GateScript::verification());
        answer(&mut gate, "color", "red");

        assert_eq!(submit(&mut gate), Err(DomainError::ValidationMismatch));
    }

    #[test]
    fn test_error_clears_after_two_seconds() {
        let mut gate = mounted(GateScript::verification());
        let _ = submit(&mut gate);

        advance(&mut gate, 1_999);
        let still_shown = gate.error().is_some();
        advance(&mut gate, 2_000);

        assert!(still_shown);
        assert_eq!(gate.error(), None);
        assert!(
            gate.take_events()
                .iter()
                .any(|e| matches!(e.kind, GateEventKind::ErrorCleared))
        );
    }

    #[test]
    fn test_resubmit_replaces_clear_timer() {
        // Arrange
        let mut gate = mounted(GateScript::verification());
        let _ = submit(&mut gate);
        advance(&mut gate, 1_500);

        // Act
        let _ = submit(&mut gate);
        advance(&mut gate, 2_100);
        let shown_after_first_deadline = gate.error().is_some();
        advance(&mut gate, 3_500);

        // Assert
        assert!(shown_after_first_deadline);
        assert_eq!(gate.error(), None);
        let cleared = gate
            .take_events()
            .iter()
            .filter(|e| matches!(e.kind, GateEventKind::ErrorCleared))
            .count();
        assert_eq!(cleared, 1);
    }

    #[test]
    fn test_retry_after_rejection_can_succeed() {
        let mut gate = mounted(GateScript::verification());
        fill(&mut gate, "tulip");
        let _ = submit(&mut gate);

        answer(&mut gate, "flower", "panzie");
        submit(&mut gate).unwrap();

        assert!(gate.is_unlocked());
        assert_eq!(gate.error(), None);
    }

    #[test]
    fn test_many_wrong_submissions_never_lock_the_gate() {
        // Arrange
        let mut gate = mounted(GateScript::verification());
        fill(&mut gate, "tulip");
        for _ in 0..50 {
            let _ = submit(&mut gate);
        }

        // Act
        answer(&mut gate, "flower", "panzie");
        let result = submit(&mut gate);

        // Assert
        assert!(result.is_ok());
        assert!(gate.is_unlocked());
        let rejected = gate
            .take_events()
            .iter()
            .filter(|e| matches!(e.kind, GateEventKind::AnswersRejected { .. }))
            .count();
        assert_eq!(rejected, 50);
    }

    #[test]
    fn test_input_after_unlock_is_rejected() {
        let mut gate = mounted(GateScript::verification());
        fill(&mut gate, "panzie");
        submit(&mut gate).unwrap();

        let result = submit(&mut gate);

        assert!(matches!(result, Err(DomainError::InvalidTransition(_))));
    }

    #[test]
    fn test_unknown_question_is_a_validation_error() {
        let mut gate = mounted(GateScript::verification());

        let result = gate.handle(
            GateInput::Answer {
                question_id: "shoeSize".to_owned(),
                value: "7".to_owned(),
            },
            &fixed_clock(),
            &mut MockRng,
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_puzzle_waits_longer_before_completing() {
        let mut gate = Gate::puzzle(GateScript::puzzle()).unwrap();
        gate.mount(&fixed_clock(), &mut MockRng).unwrap();
        answer(&mut gate, "nickname", "  Princess ");

        submit(&mut gate).unwrap();
        advance(&mut gate, 2_499);
        let early = gate.is_complete();
        advance(&mut gate, 2_500);

        assert!(!early);
        assert!(gate.is_complete());
        assert_eq!(gate.stage(), StageKind::Puzzle);
    }

    #[test]
    fn test_teardown_drops_pending_clear() {
        let mut gate = mounted(GateScript::verification());
        let _ = submit(&mut gate);

        assert_eq!(gate.teardown(), 1);
        assert_eq!(gate.next_deadline(), None);
    }
}
