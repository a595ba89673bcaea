//! The mini-game screen.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, instrument};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{EventMetadata, StageKind};
use valentine_core::geometry::Point;
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::{Millis, Scheduler, TimerToken};
use valentine_core::screen::Screen;

use crate::domain::burst::Burst;
use crate::domain::events::{HeartCaught, HeartsEvent, HeartsEventKind};
use crate::domain::script::{Heart, HeartsScript};

/// Player input on the mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartsInput {
    /// Catch the heart with this id.
    Catch(usize),
}

/// What a catch attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchOutcome {
    /// The heart was pending and is now caught.
    Caught {
        /// Hearts still pending.
        remaining: usize,
    },
    /// Unknown or already caught; nothing changed.
    Ignored,
}

/// The message currently on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShownMessage {
    /// The heart it came from.
    pub heart: usize,
    /// The text.
    pub text: String,
    /// Position, percent.
    pub position: Point,
}

/// Timer keys on the mini-game's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartsTimer {
    /// Hide the shown message.
    DismissMessage,
    /// Remove a burst.
    ClearBurst(u64),
    /// Show the completion notice.
    AllCaught,
    /// Complete the stage.
    Complete,
}

/// Catch every heart to move on.
#[derive(Debug)]
pub struct Hearts {
    script: HeartsScript,
    pending: BTreeSet<usize>,
    timers: Scheduler<HeartsTimer>,
    message: Option<ShownMessage>,
    dismiss: Option<TimerToken>,
    bursts: Vec<Burst>,
    next_burst: u64,
    all_caught: bool,
    mounted: bool,
    torn_down: bool,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<HeartsEvent>,
}

impl Hearts {
    /// Builds an unmounted mini-game with every heart pending.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if the script has no hearts.
    pub fn new(script: HeartsScript) -> Result<Self, DomainError> {
        script.validate()?;
        let pending = (0..script.hearts.len()).collect();
        Ok(Self {
            script,
            pending,
            timers: Scheduler::new(),
            message: None,
            dismiss: None,
            bursts: Vec::new(),
            next_burst: 0,
            all_caught: false,
            mounted: false,
            torn_down: false,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// The mini-game's script.
    #[must_use]
    pub fn script(&self) -> &HeartsScript {
        &self.script
    }

    /// Hearts still on screen, with their ids.
    pub fn pending_hearts(&self) -> impl Iterator<Item = (usize, &Heart)> + '_ {
        self.pending
            .iter()
            .filter_map(|&id| self.script.hearts.get(id).map(|heart| (id, heart)))
    }

    /// Hearts caught so far.
    #[must_use]
    pub fn caught(&self) -> usize {
        self.script.hearts.len() - self.pending.len()
    }

    /// The message on screen.
    #[must_use]
    pub fn message(&self) -> Option<&ShownMessage> {
        self.message.as_ref()
    }

    /// Bursts still animating.
    #[must_use]
    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    /// Whether the completion notice is showing.
    #[must_use]
    pub fn is_all_caught(&self) -> bool {
        self.all_caught
    }

    /// Catches heart `id` if it is still pending.
    pub fn catch(&mut self, id: usize, clock: &dyn Clock, rng: &mut dyn DeterministicRng) -> CatchOutcome {
        if !self.mounted || self.torn_down || !self.pending.remove(&id) {
            debug!(heart = id, "ignoring catch");
            return CatchOutcome::Ignored;
        }
        let Some(heart) = self.script.hearts.get(id).cloned() else {
            return CatchOutcome::Ignored;
        };
        let remaining = self.pending.len();
        let position = heart.message_position();

        let burst = Burst::spray(
            self.next_burst,
            Point::new(heart.x, heart.y),
            self.script.droplets,
            rng,
        );
        self.next_burst += 1;
        self.timers
            .schedule(self.script.burst_ms, HeartsTimer::ClearBurst(burst.id));

        if let Some(token) = self.dismiss.take() {
            self.timers.cancel(token);
        }
        self.dismiss = Some(
            self.timers
                .schedule(self.script.message_ms, HeartsTimer::DismissMessage),
        );
        self.message = Some(ShownMessage {
            heart: id,
            text: heart.message.clone(),
            position,
        });

        info!(heart = id, remaining, "heart caught");
        self.record(
            HeartsEventKind::HeartCaught(HeartCaught {
                heart: id,
                message: heart.message,
                position,
                caught: self.caught(),
                remaining,
            }),
            clock,
        );
        self.record(HeartsEventKind::BurstSpawned(burst.clone()), clock);
        self.bursts.push(burst);

        if remaining == 0 {
            self.timers
                .schedule(self.script.all_caught_delay_ms, HeartsTimer::AllCaught);
            self.timers
                .schedule(self.script.complete_delay_ms, HeartsTimer::Complete);
        }
        CatchOutcome::Caught { remaining }
    }

    fn on_timer(&mut self, key: HeartsTimer, clock: &dyn Clock) {
        match key {
            HeartsTimer::DismissMessage => {
                self.dismiss = None;
                if self.message.take().is_some() {
                    self.record(HeartsEventKind::MessageDismissed, clock);
                }
            }
            HeartsTimer::ClearBurst(id) => {
                self.bursts.retain(|burst| burst.id != id);
                self.record(HeartsEventKind::BurstCleared { burst: id }, clock);
            }
            HeartsTimer::AllCaught => {
                self.all_caught = true;
                self.record(
                    HeartsEventKind::AllHeartsCaught {
                        message: self.script.completion_message.clone(),
                    },
                    clock,
                );
            }
            HeartsTimer::Complete => {
                if !self.completed {
                    self.completed = true;
                    self.timers.cancel_all();
                    info!("hearts completed");
                    self.record(HeartsEventKind::StageCompleted, clock);
                }
            }
        }
    }

    fn record(&mut self, kind: HeartsEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            StageKind::Hearts,
            self.next_sequence_number(),
            self.timers.now(),
            clock,
        );
        self.uncommitted_events.push(HeartsEvent { metadata, kind });
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }
}

impl Screen for Hearts {
    type Input = HeartsInput;
    type Event = HeartsEvent;

    fn stage(&self) -> StageKind {
        StageKind::Hearts
    }

    #[instrument(skip_all)]
    fn mount(&mut self, clock: &dyn Clock, _rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if self.mounted {
            return Err(DomainError::InvalidTransition("hearts already mounted".to_owned()));
        }
        self.mounted = true;
        self.record(
            HeartsEventKind::Presented {
                hearts: self.script.hearts.len(),
            },
            clock,
        );
        Ok(())
    }

    fn handle(
        &mut self,
        input: HeartsInput,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        let HeartsInput::Catch(id) = input;
        self.catch(id, clock, rng);
        Ok(())
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

    fn uncommitted_events(&self) -> &[HeartsEvent] {
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
        self.torn_down = true;
        self.dismiss = None;
        self.timers.cancel_all()
    }
}
