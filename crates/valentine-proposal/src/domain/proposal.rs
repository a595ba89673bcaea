//! The proposal screen.

use serde::Serialize;
use tracing::{debug, info, instrument};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{EventMetadata, StageKind};
use valentine_core::geometry::{Point, Viewport};
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::{Millis, Scheduler, TimerToken};
use valentine_core::screen::Screen;
use valentine_core::sequencer::{PhaseScript, PhaseTimer, Sequencer, Step};

use crate::domain::events::{
    Celebration, Confetti, NoButtonMoved, ProposalEvent, ProposalEventKind,
};
use crate::domain::placement::{PlacementRules, center_of, reposition};
use crate::domain::script::ProposalScript;

const CONFETTI_SPREAD: f64 = 400.0;
const CONFETTI_STAGGER_MS: u64 = 50;

/// Reveal phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProposalPhase {
    /// Nothing yet.
    PinkStarsPending,
    /// The stars are turning pink.
    PinkStars,
    /// The question is showing.
    Title,
    /// The yes button is showing.
    YesButton,
    /// Everything is showing; terminal.
    NoButton,
}

impl ProposalPhase {
    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PinkStarsPending => "pink-stars-pending",
            Self::PinkStars => "pink-stars",
            Self::Title => "title",
            Self::YesButton => "yes-button",
            Self::NoButton => "no-button",
        }
    }
}

/// Player input on the proposal screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProposalInput {
    /// The pointer moved to this position, in pixels.
    PointerMoved(Point),
    /// Reach for the no button: a pointer sample on its centre.
    ReachForNo,
    /// Press yes.
    Accept,
}

/// Timer keys on the proposal's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalTimer {
    /// Leave the current reveal phase.
    Phase(PhaseTimer),
    /// Evaluate the latest pointer sample.
    Frame,
}

impl From<PhaseTimer> for ProposalTimer {
    fn from(timer: PhaseTimer) -> Self {
        Self::Phase(timer)
    }
}

/// Will you be my valentine?
#[derive(Debug)]
pub struct Proposal {
    script: ProposalScript,
    viewport: Viewport,
    timers: Scheduler<ProposalTimer>,
    sequencer: Sequencer<ProposalPhase>,
    no_button: Point,
    moved: bool,
    latest_pointer: Option<Point>,
    frame: Option<TimerToken>,
    celebration: Option<Celebration>,
    mounted: bool,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<ProposalEvent>,
}

impl Proposal {
    /// Builds an unmounted proposal laid out in `viewport`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if the geometry is unusable.
    pub fn new(script: ProposalScript, viewport: Viewport) -> Result<Self, DomainError> {
        script.validate()?;
        let phases = PhaseScript::new(vec![
            Step::after(ProposalPhase::PinkStarsPending, script.pink_stars_delay_ms),
            Step::after(ProposalPhase::PinkStars, script.title_delay_ms),
            Step::after(ProposalPhase::Title, script.yes_delay_ms),
            Step::after(ProposalPhase::YesButton, script.no_delay_ms),
            Step::terminal(ProposalPhase::NoButton),
        ])?;
        // The no button starts beside the yes button, just right of centre.
        let center = viewport.center();
        let no_button = Point::new(center.x + script.padding, center.y);
        Ok(Self {
            script,
            viewport,
            timers: Scheduler::new(),
            sequencer: Sequencer::new(phases),
            no_button,
            moved: false,
            latest_pointer: None,
            frame: None,
            celebration: None,
            mounted: false,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// The proposal's script.
    #[must_use]
    pub fn script(&self) -> &ProposalScript {
        &self.script
    }

    /// The active reveal phase.
    #[must_use]
    pub fn phase(&self) -> Option<ProposalPhase> {
        self.sequencer.current()
    }

    /// Whether `phase` has been reached.
    #[must_use]
    pub fn is_revealed(&self, phase: ProposalPhase) -> bool {
        self.phase().is_some_and(|current| current >= phase)
    }

    /// Top-left corner of the no button.
    #[must_use]
    pub fn no_button(&self) -> Point {
        self.no_button
    }

    /// Whether the no button has left its starting spot.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// The celebration, once accepted.
    #[must_use]
    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    fn evading(&self) -> bool {
        self.is_revealed(ProposalPhase::NoButton) && self.celebration.is_none()
    }

    fn sample(&mut self, pointer: Point) {
        if !self.evading() {
            return;
        }
        self.latest_pointer = Some(pointer);
        if self.frame.is_none() {
            self.frame = Some(self.timers.schedule(self.script.frame_ms, ProposalTimer::Frame));
        }
    }

    fn on_frame(&mut self, clock: &dyn Clock, rng: &mut dyn DeterministicRng) {
        self.frame = None;
        let Some(pointer) = self.latest_pointer.take() else {
            return;
        };
        if !self.evading() {
            return;
        }
        let center = center_of(self.no_button, self.script.no_button);
        if pointer.distance_to(center) >= self.script.detect_radius {
            return;
        }
        let placement = reposition(
            pointer,
            self.viewport,
            self.script.no_button,
            PlacementRules {
                padding: self.script.padding,
                min_distance: self.script.min_distance,
                max_attempts: self.script.max_attempts,
            },
            rng,
        );
        debug!(
            x = placement.position.x,
            y = placement.position.y,
            attempts = placement.attempts,
            fallback = placement.fallback,
            "no button dodged"
        );
        self.no_button = placement.position;
        self.moved = true;
        self.record(
            ProposalEventKind::NoButtonMoved(NoButtonMoved { pointer, placement }),
            clock,
        );
    }

    fn accept(&mut self, clock: &dyn Clock, rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if !self.is_revealed(ProposalPhase::YesButton) {
            return Err(DomainError::InvalidTransition(
                "yes button is not showing yet".to_owned(),
            ));
        }
        if let Some(token) = self.frame.take() {
            self.timers.cancel(token);
        }
        self.latest_pointer = None;

        let confetti = (0..self.script.confetti)
            .map(|i| Confetti {
                dx: (rng.next_f64() - 0.5) * CONFETTI_SPREAD,
                dy: (rng.next_f64() - 0.5) * CONFETTI_SPREAD,
                delay_ms: u64::from(i) * CONFETTI_STAGGER_MS,
            })
            .collect();
        let celebration = Celebration {
            title: self.script.celebration_title.clone(),
            message: self.script.celebration_message.clone(),
            footer: self.script.celebration_footer.clone(),
            confetti,
        };
        self.celebration = Some(celebration.clone());
        info!(dodges = self.moved, "proposal accepted");
        self.record(ProposalEventKind::ProposalAccepted(celebration), clock);

        self.completed = true;
        self.timers.cancel_all();
        self.record(ProposalEventKind::StageCompleted, clock);
        Ok(())
    }

    fn enter(&mut self, phase: ProposalPhase, clock: &dyn Clock) {
        info!(phase = phase.as_str(), "proposal phase entered");
        self.record(ProposalEventKind::PhaseEntered { phase }, clock);
        if phase == ProposalPhase::PinkStars {
            self.record(ProposalEventKind::PinkStarsStarted, clock);
        }
    }

    fn record(&mut self, kind: ProposalEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            StageKind::Proposal,
            self.next_sequence_number(),
            self.timers.now(),
            clock,
        );
        self.uncommitted_events.push(ProposalEvent { metadata, kind });
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }
}

impl Screen for Proposal {
    type Input = ProposalInput;
    type Event = ProposalEvent;

    fn stage(&self) -> StageKind {
        StageKind::Proposal
    }

    #[instrument(skip_all)]
    fn mount(&mut self, clock: &dyn Clock, _rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if self.mounted {
            return Err(DomainError::InvalidTransition("proposal already mounted".to_owned()));
        }
        self.mounted = true;
        let entered = self.sequencer.start(&mut self.timers)?;
        self.enter(entered.phase, clock);
        Ok(())
    }

    fn handle(
        &mut self,
        input: ProposalInput,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        if !self.mounted || self.completed {
            return Err(DomainError::InvalidTransition(
                "proposal is not accepting input".to_owned(),
            ));
        }
        match input {
            ProposalInput::PointerMoved(pointer) => self.sample(pointer),
            ProposalInput::ReachForNo => {
                self.sample(center_of(self.no_button, self.script.no_button));
            }
            ProposalInput::Accept => self.accept(clock, rng)?,
        }
        Ok(())
    }

    fn now(&self) -> Millis {
        self.timers.now()
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    fn advance_to(&mut self, until: Millis, clock: &dyn Clock, rng: &mut dyn DeterministicRng) {
        while let Some(fired) = self.timers.pop_due(until) {
            match fired.key {
                ProposalTimer::Phase(timer) => {
                    if let Some(entered) = self.sequencer.on_timer(timer, &mut self.timers) {
                        self.enter(entered.phase, clock);
                    }
                }
                ProposalTimer::Frame => self.on_frame(clock, rng),
            }
        }
        self.timers.settle(until);
    }

    fn uncommitted_events(&self) -> &[ProposalEvent] {
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
        self.frame = None;
        self.timers.cancel_all()
    }
}
