//! Screen abstraction.

use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::{DomainEvent, StageKind};
use crate::rng::DeterministicRng;
use crate::scheduler::Millis;

/// A top-level stage of the experience, driven by input and virtual time.
///
/// The driver mounts the screen, feeds it input, asks for the next deadline,
/// advances virtual time to it, and drains the recorded events after each
/// step. Once [`Screen::is_complete`] reports `true` the driver tears the
/// screen down and drops it.
pub trait Screen: Send {
    /// User input the screen accepts.
    type Input;

    /// The event type this screen records.
    type Event: DomainEvent + Clone;

    /// Which stage this screen implements.
    fn stage(&self) -> StageKind;

    /// Starts the screen's scripted flow and timers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if mounted twice.
    fn mount(&mut self, clock: &dyn Clock, rng: &mut dyn DeterministicRng)
    -> Result<(), DomainError>;

    /// Applies one user input at the current virtual time.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the input is invalid in the current state.
    fn handle(
        &mut self,
        input: Self::Input,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError>;

    /// Current virtual time.
    fn now(&self) -> Millis;

    /// Deadline of the next pending timer, if any.
    fn next_deadline(&self) -> Option<Millis>;

    /// Fires every timer due at or before `until`, in order.
    fn advance_to(&mut self, until: Millis, clock: &dyn Clock, rng: &mut dyn DeterministicRng);

    /// Events recorded since the last clear.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears recorded events after the driver has consumed them.
    fn clear_uncommitted_events(&mut self);

    /// Whether the screen has signalled completion.
    fn is_complete(&self) -> bool;

    /// Cancels every outstanding timer. Returns how many were cancelled.
    fn teardown(&mut self) -> usize;

    /// Returns and clears the recorded events.
    fn take_events(&mut self) -> Vec<Self::Event> {
        let events = self.uncommitted_events().to_vec();
        self.clear_uncommitted_events();
        events
    }
}
