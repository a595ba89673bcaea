//! The typewriter component.

use serde::Serialize;
use tracing::{debug, trace};
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::{Millis, Scheduler, TimerToken};

use crate::policy::DelayPolicy;
use crate::session::RevealSession;

/// Timer keys the typewriter schedules on its owner's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterTimer {
    /// Reveal the next character of `session`.
    Reveal {
        /// Session the timer belongs to.
        session: u64,
    },
    /// Report completion of `session`.
    Complete {
        /// Session the timer belongs to.
        session: u64,
    },
    /// Toggle cursor visibility.
    Blink,
}

/// Something the owning screen should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypewriterUpdate {
    /// The visible prefix grew (or was reset to empty for a new session).
    PrefixShown {
        /// Session the prefix belongs to.
        session: u64,
        /// The visible text.
        prefix: String,
        /// Characters visible.
        cursor: usize,
    },
    /// The session finished, including the trailing pause.
    RevealCompleted {
        /// Session that finished.
        session: u64,
        /// The full text that was revealed.
        text: String,
    },
    /// The blinking cursor changed visibility.
    CursorToggled {
        /// Whether the cursor is now visible.
        visible: bool,
    },
}

/// Character-by-character revealer with a blinking cursor.
///
/// Every reveal step is a single-shot timer; starting a new session cancels
/// the pending step of the old one, and the session id carried by each timer
/// is checked again when it fires.
#[derive(Debug)]
pub struct Typewriter {
    generation: u64,
    session: Option<RevealSession>,
    step: Option<TimerToken>,
    blink: Option<TimerToken>,
    cursor_visible: bool,
    active: bool,
}

impl Typewriter {
    /// Pause between the last character and the completion report.
    pub const COMPLETION_PAUSE_MS: Millis = 450;
    /// Cursor blink period.
    pub const CURSOR_BLINK_MS: Millis = 530;

    /// Creates an idle typewriter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            session: None,
            step: None,
            blink: None,
            cursor_visible: true,
            active: true,
        }
    }

    /// Starts the cursor blink. Idempotent.
    pub fn mount<K>(&mut self, timers: &mut Scheduler<K>)
    where
        K: From<TypewriterTimer> + Clone,
    {
        if self.active && self.blink.is_none() {
            self.blink = Some(
                timers.schedule_repeating(Self::CURSOR_BLINK_MS, K::from(TypewriterTimer::Blink)),
            );
        }
    }

    /// Starts revealing `text`, abandoning any session in flight. The first
    /// character is shown immediately.
    pub fn start<K>(
        &mut self,
        text: &str,
        policy: DelayPolicy,
        timers: &mut Scheduler<K>,
        rng: &mut dyn DeterministicRng,
    ) -> Vec<TypewriterUpdate>
    where
        K: From<TypewriterTimer> + Clone,
    {
        if !self.active {
            return Vec::new();
        }
        if let Some(token) = self.step.take() {
            timers.cancel(token);
        }
        self.generation += 1;
        debug!(
            session = self.generation,
            chars = text.chars().count(),
            speed_ms = policy.base_speed_ms(),
            "starting reveal"
        );

        let mut updates = vec![TypewriterUpdate::PrefixShown {
            session: self.generation,
            prefix: String::new(),
            cursor: 0,
        }];
        self.session = Some(RevealSession::new(self.generation, text, policy));
        self.type_next(timers, rng, &mut updates);
        updates
    }

    /// Handles a fired typewriter timer.
    pub fn on_timer<K>(
        &mut self,
        timer: TypewriterTimer,
        timers: &mut Scheduler<K>,
        rng: &mut dyn DeterministicRng,
    ) -> Vec<TypewriterUpdate>
    where
        K: From<TypewriterTimer> + Clone,
    {
        let mut updates = Vec::new();
        if !self.active {
            return updates;
        }
        match timer {
            TypewriterTimer::Blink => {
                self.cursor_visible = !self.cursor_visible;
                updates.push(TypewriterUpdate::CursorToggled {
                    visible: self.cursor_visible,
                });
            }
            TypewriterTimer::Reveal { session } if self.is_current(session) => {
                self.step = None;
                self.type_next(timers, rng, &mut updates);
            }
            TypewriterTimer::Complete { session } if self.is_current(session) => {
                self.step = None;
                if let Some(current) = self.session.as_mut() {
                    if current.complete() {
                        debug!(session, "reveal completed");
                        updates.push(TypewriterUpdate::RevealCompleted {
                            session,
                            text: current.text().to_owned(),
                        });
                    }
                }
            }
            TypewriterTimer::Reveal { session } | TypewriterTimer::Complete { session } => {
                trace!(session, current = self.generation, "ignoring stale typewriter timer");
            }
        }
        updates
    }

    /// Cancels the pending step and the cursor blink; nothing is reported
    /// afterwards. Returns how many timers were cancelled.
    pub fn teardown<K: Clone>(&mut self, timers: &mut Scheduler<K>) -> usize {
        self.active = false;
        [self.step.take(), self.blink.take()]
            .into_iter()
            .flatten()
            .filter(|token| timers.cancel(*token))
            .count()
    }

    /// The visible prefix of the current session.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.session.as_ref().map_or("", RevealSession::prefix)
    }

    /// The current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&RevealSession> {
        self.session.as_ref()
    }

    /// Whether the current session has reported completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.as_ref().is_some_and(RevealSession::is_completed)
    }

    /// Whether the blinking cursor is currently visible.
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn is_current(&self, session: u64) -> bool {
        self.session.as_ref().is_some_and(|s| s.id() == session)
    }

    fn type_next<K>(
        &mut self,
        timers: &mut Scheduler<K>,
        rng: &mut dyn DeterministicRng,
        updates: &mut Vec<TypewriterUpdate>,
    ) where
        K: From<TypewriterTimer> + Clone,
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let id = session.id();
        if let Some((previous, current)) = session.reveal_next() {
            updates.push(TypewriterUpdate::PrefixShown {
                session: id,
                prefix: session.prefix().to_owned(),
                cursor: session.cursor(),
            });
            let delay = session.policy().delay_for(previous, current, rng);
            self.step = Some(timers.schedule(delay, K::from(TypewriterTimer::Reveal { session: id })));
        } else {
            self.step = Some(timers.schedule(
                Self::COMPLETION_PAUSE_MS,
                K::from(TypewriterTimer::Complete { session: id }),
            ));
        }
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new()
    }
}
