//! The cutscene screen.

use std::convert::Infallible;

use tracing::{info, instrument, warn};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{EventMetadata, StageKind};
use valentine_core::geometry::Viewport;
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::{Millis, Scheduler};
use valentine_core::screen::Screen;
use valentine_core::sequencer::{Entered, PhaseTimer, Sequencer};
use valentine_typewriter::{Typewriter, TypewriterTimer, TypewriterUpdate};

use crate::domain::events::{CutsceneEvent, CutsceneEventKind, PhaseEntered, TextRevealed};
use crate::domain::phase::CutscenePhase;
use crate::domain::script::CutsceneScript;
use crate::domain::stars::ShootingStar;

/// Timer keys on the cutscene's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutsceneTimer {
    /// Leave the current phase.
    Phase(PhaseTimer),
    /// Typewriter step or cursor blink.
    Typewriter(TypewriterTimer),
    /// Launch the shooting star.
    ShootingStar,
}

impl From<PhaseTimer> for CutsceneTimer {
    fn from(timer: PhaseTimer) -> Self {
        Self::Phase(timer)
    }
}

impl From<TypewriterTimer> for CutsceneTimer {
    fn from(timer: TypewriterTimer) -> Self {
        Self::Typewriter(timer)
    }
}

/// The lights-out cutscene. Takes no input.
#[derive(Debug)]
pub struct Cutscene {
    script: CutsceneScript,
    viewport: Viewport,
    timers: Scheduler<CutsceneTimer>,
    sequencer: Sequencer<CutscenePhase>,
    typewriter: Typewriter,
    shooting_star: Option<ShootingStar>,
    stars_started: bool,
    mounted: bool,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<CutsceneEvent>,
}

impl Cutscene {
    /// Builds an unmounted cutscene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a line has a zero typing speed.
    pub fn new(script: CutsceneScript, viewport: Viewport) -> Result<Self, DomainError> {
        script.validate()?;
        let sequencer = Sequencer::new(script.phase_script()?);
        Ok(Self {
            script,
            viewport,
            timers: Scheduler::new(),
            sequencer,
            typewriter: Typewriter::new(),
            shooting_star: None,
            stars_started: false,
            mounted: false,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// The active phase, once mounted.
    #[must_use]
    pub fn phase(&self) -> Option<CutscenePhase> {
        self.sequencer.current()
    }

    /// The visible part of the current line.
    #[must_use]
    pub fn typed_text(&self) -> &str {
        self.typewriter.prefix()
    }

    /// The shooting star, once launched.
    #[must_use]
    pub fn shooting_star(&self) -> Option<ShootingStar> {
        self.shooting_star
    }

    fn enter(
        &mut self,
        entered: Entered<CutscenePhase>,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) {
        let phase = entered.phase;
        info!(phase = phase.as_str(), at_ms = self.timers.now(), "cutscene phase entered");
        self.record(
            CutsceneEventKind::PhaseEntered(PhaseEntered {
                phase,
                backdrop: phase.backdrop(),
            }),
            clock,
        );

        if let Some(line) = self.script.line_for(phase) {
            let updates = match line.policy() {
                Ok(policy) => self.typewriter.start(&line.text, policy, &mut self.timers, rng),
                Err(error) => {
                    warn!(%error, phase = phase.as_str(), "skipping line");
                    Vec::new()
                }
            };
            self.apply_typewriter(updates, clock);
        }

        match phase {
            CutscenePhase::Stars if !self.stars_started => {
                self.stars_started = true;
                self.record(CutsceneEventKind::StarsStarted, clock);
                self.timers
                    .schedule(self.script.shooting_star_delay_ms, CutsceneTimer::ShootingStar);
            }
            _ if entered.terminal => self.complete(clock),
            _ => {}
        }
    }

    fn complete(&mut self, clock: &dyn Clock) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.typewriter.teardown(&mut self.timers);
        self.timers.cancel_all();
        info!("cutscene completed");
        self.record(CutsceneEventKind::StageCompleted, clock);
    }

    fn apply_typewriter(&mut self, updates: Vec<TypewriterUpdate>, clock: &dyn Clock) {
        for update in updates {
            let kind = match update {
                TypewriterUpdate::PrefixShown { prefix, cursor, .. } => {
                    CutsceneEventKind::TextRevealed(TextRevealed { prefix, cursor })
                }
                TypewriterUpdate::RevealCompleted { text, .. } => {
                    if let Err(error) = self.sequencer.signal(&mut self.timers) {
                        warn!(%error, "typewriter finished outside a text phase");
                    }
                    CutsceneEventKind::TextCompleted { text }
                }
                TypewriterUpdate::CursorToggled { visible } => {
                    CutsceneEventKind::CursorToggled { visible }
                }
            };
            self.record(kind, clock);
        }
    }

    fn on_timer(&mut self, key: CutsceneTimer, clock: &dyn Clock, rng: &mut dyn DeterministicRng) {
        match key {
            CutsceneTimer::Phase(timer) => {
                if let Some(entered) = self.sequencer.on_timer(timer, &mut self.timers) {
                    self.enter(entered, clock, rng);
                }
            }
            CutsceneTimer::Typewriter(timer) => {
                let updates = self.typewriter.on_timer(timer, &mut self.timers, rng);
                self.apply_typewriter(updates, clock);
            }
            CutsceneTimer::ShootingStar => {
                let star = ShootingStar::launch(self.viewport, rng);
                self.shooting_star = Some(star);
                self.record(CutsceneEventKind::ShootingStarLaunched(star), clock);
            }
        }
    }

    fn record(&mut self, kind: CutsceneEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            StageKind::Cutscene,
            self.next_sequence_number(),
            self.timers.now(),
            clock,
        );
        self.uncommitted_events.push(CutsceneEvent { metadata, kind });
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }
}

impl Screen for Cutscene {
    type Input = Infallible;
    type Event = CutsceneEvent;

    fn stage(&self) -> StageKind {
        StageKind::Cutscene
    }

    #[instrument(skip_all)]
    fn mount(&mut self, clock: &dyn Clock, rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if self.mounted {
            return Err(DomainError::InvalidTransition(
                "cutscene already mounted".to_owned(),
            ));
        }
        self.mounted = true;
        self.typewriter.mount(&mut self.timers);
        let entered = self.sequencer.start(&mut self.timers)?;
        self.enter(entered, clock, rng);
        Ok(())
    }

    fn handle(
        &mut self,
        input: Self::Input,
        _clock: &dyn Clock,
        _rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        match input {}
    }

    fn now(&self) -> Millis {
        self.timers.now()
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    fn advance_to(&mut self, until: Millis, clock: &dyn Clock, rng: &mut dyn DeterministicRng) {
        while let Some(fired) = self.timers.pop_due(until) {
            self.on_timer(fired.key, clock, rng);
        }
        self.timers.settle(until);
    }

    fn uncommitted_events(&self) -> &[CutsceneEvent] {
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
        self.typewriter.teardown(&mut self.timers) + self.timers.cancel_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::event::{DomainEvent, StageSignal};
    use valentine_test_support::{MockRng, fixed_clock};

    fn mounted() -> Cutscene {
        let mut cutscene = Cutscene::new(CutsceneScript::default(), Viewport::default()).unwrap();
        cutscene.mount(&fixed_clock(), &mut MockRng).unwrap();
        cutscene
    }

    fn run_to_end(cutscene: &mut Cutscene) -> Vec<CutsceneEvent> {
        cutscene.advance_to(120_000, &fixed_clock(), &mut MockRng);
        cutscene.take_events()
    }

    fn entered_at(events: &[CutsceneEvent], phase: CutscenePhase) -> Millis {
        events
            .iter()
            .find_map(|e| match &e.kind {
                CutsceneEventKind::PhaseEntered(p) if p.phase == phase => Some(e.metadata.at_ms),
                _ => None,
            })
            .unwrap()
    }

    fn completed_at(events: &[CutsceneEvent], text: &str) -> Millis {
        events
            .iter()
            .find_map(|e| match &e.kind {
                CutsceneEventKind::TextCompleted { text: t } if t == text => Some(e.metadata.at_ms),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_visits_every_phase_in_order() {
        // Arrange
        let mut cutscene = mounted();

        // Act
        let events = run_to_end(&mut cutscene);

        // Assert
        let phases: Vec<CutscenePhase> = events
            .iter()
            .filter_map(|e| match &e.kind {
                CutsceneEventKind::PhaseEntered(p) => Some(p.phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                CutscenePhase::Dark,
                CutscenePhase::LightsOutText,
                CutscenePhase::FlashWhite,
                CutscenePhase::TooMuch,
                CutscenePhase::Subtitle,
                CutscenePhase::BackToDark,
                CutscenePhase::BetterText,
                CutscenePhase::Stars,
                CutscenePhase::Done,
            ]
        );
        assert!(cutscene.is_complete());
        assert_eq!(cutscene.next_deadline(), None);
    }

    #[test]
    fn test_phase_timings_follow_script() {
        let mut cutscene = mounted();
        let events = run_to_end(&mut cutscene);
        let script = CutsceneScript::default();

        assert_eq!(entered_at(&events, CutscenePhase::LightsOutText), 1_500);
        let lights_out_done = completed_at(&events, &script.lights_out.text);
        assert_eq!(entered_at(&events, CutscenePhase::FlashWhite), lights_out_done + 800);
        assert_eq!(
            entered_at(&events, CutscenePhase::TooMuch),
            lights_out_done + 800 + 100
        );
        let subtitle = entered_at(&events, CutscenePhase::Subtitle);
        assert_eq!(subtitle, completed_at(&events, "TOO MUCH!!") + 300);
        assert_eq!(entered_at(&events, CutscenePhase::BackToDark), subtitle + 2_500);
        assert_eq!(entered_at(&events, CutscenePhase::BetterText), subtitle + 3_700);
        let stars = entered_at(&events, CutscenePhase::Stars);
        assert_eq!(stars, completed_at(&events, &script.better.text) + 2_000);
        assert_eq!(entered_at(&events, CutscenePhase::Done), stars + 5_700);
    }

    #[test]
    fn test_stars_signal_precedes_completion_once() {
        let mut cutscene = mounted();

        let events = run_to_end(&mut cutscene);

        let signals: Vec<StageSignal> = events.iter().filter_map(DomainEvent::signal).collect();
        assert_eq!(signals, vec![StageSignal::StarsStart, StageSignal::Complete]);
        let star = events
            .iter()
            .find(|e| matches!(e.kind, CutsceneEventKind::ShootingStarLaunched(_)))
            .unwrap();
        let stars = entered_at(&events, CutscenePhase::Stars);
        assert_eq!(star.metadata.at_ms, stars + 2_800);
        assert!(cutscene.shooting_star().is_some());
    }

    #[test]
    fn test_text_phases_wait_for_typing() {
        let mut cutscene = mounted();

        cutscene.advance_to(1_600, &fixed_clock(), &mut MockRng);

        assert_eq!(cutscene.phase(), Some(CutscenePhase::LightsOutText));
        assert!(cutscene.typed_text().starts_with('W'));
        assert!(cutscene.typed_text().len() < "Wait, where'd the lights go?".len());
    }

    #[test]
    fn test_sequence_numbers_continue_across_clears() {
        let mut cutscene = mounted();
        let first = cutscene.take_events();

        cutscene.advance_to(1_500, &fixed_clock(), &mut MockRng);
        let second = cutscene.take_events();

        let last = first.last().unwrap().metadata.sequence_number;
        assert_eq!(second[0].metadata.sequence_number, last + 1);
    }

    #[test]
    fn test_teardown_mid_sequence_stops_everything() {
        // Arrange
        let mut cutscene = mounted();
        cutscene.advance_to(2_000, &fixed_clock(), &mut MockRng);
        cutscene.clear_uncommitted_events();

        // Act
        let cancelled = cutscene.teardown();
        cutscene.advance_to(120_000, &fixed_clock(), &mut MockRng);

        // Assert
        assert!(cancelled >= 2);
        assert!(cutscene.uncommitted_events().is_empty());
        assert!(!cutscene.is_complete());
    }

    #[test]
    fn test_mount_twice_is_rejected() {
        let mut cutscene = mounted();

        let result = cutscene.mount(&fixed_clock(), &mut MockRng);

        assert!(matches!(result, Err(DomainError::InvalidTransition(_))));
    }
}
