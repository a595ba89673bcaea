//! The timeline screen.

use tracing::{debug, info, instrument};
use valentine_core::clock::Clock;
use valentine_core::error::DomainError;
use valentine_core::event::{EventMetadata, StageKind};
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::Millis;
use valentine_core::screen::Screen;

use crate::domain::events::{TimelineEvent, TimelineEventKind};
use crate::domain::memory::{CLOSED_MODAL_PX, Memory, TimelineScript};

/// Player input on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineInput {
    /// Open the memory at this index.
    Open(usize),
    /// Close the open memory.
    Close,
    /// Continue to the next stage.
    Proceed,
}

/// A list of memories the player can open one at a time. Has no timers.
#[derive(Debug)]
pub struct Timeline {
    script: TimelineScript,
    selected: Option<usize>,
    now: Millis,
    mounted: bool,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Builds an unmounted timeline.
    #[must_use]
    pub fn new(script: TimelineScript) -> Self {
        Self {
            script,
            selected: None,
            now: 0,
            mounted: false,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// The timeline's script.
    #[must_use]
    pub fn script(&self) -> &TimelineScript {
        &self.script
    }

    /// The memories, oldest first.
    #[must_use]
    pub fn memories(&self) -> &[Memory] {
        &self.script.memories
    }

    /// The open memory and its index.
    #[must_use]
    pub fn selected(&self) -> Option<(usize, &Memory)> {
        self.selected
            .and_then(|index| self.script.memories.get(index).map(|memory| (index, memory)))
    }

    /// Width of the memory modal in pixels.
    #[must_use]
    pub fn modal_width(&self) -> u32 {
        self.selected()
            .map_or(CLOSED_MODAL_PX, |(_, memory)| memory.modal_width())
    }

    fn open(&mut self, index: usize, clock: &dyn Clock) -> Result<(), DomainError> {
        let memory = self.script.memories.get(index).ok_or_else(|| {
            DomainError::Validation(format!(
                "memory {index} is out of range ({} memories)",
                self.script.memories.len()
            ))
        })?;
        let title = memory.title.clone();
        let modal_width = memory.modal_width();
        self.selected = Some(index);
        debug!(index, modal_width, "memory opened");
        self.record(
            TimelineEventKind::MemoryOpened {
                index,
                title,
                modal_width,
            },
            clock,
        );
        Ok(())
    }

    fn close(&mut self, clock: &dyn Clock) {
        if let Some(index) = self.selected.take() {
            self.record(TimelineEventKind::MemoryClosed { index }, clock);
        }
    }

    fn record(&mut self, kind: TimelineEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            StageKind::Timeline,
            self.next_sequence_number(),
            self.now,
            clock,
        );
        self.uncommitted_events.push(TimelineEvent { metadata, kind });
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }
}

impl Screen for Timeline {
    type Input = TimelineInput;
    type Event = TimelineEvent;

    fn stage(&self) -> StageKind {
        StageKind::Timeline
    }

    #[instrument(skip_all)]
    fn mount(&mut self, clock: &dyn Clock, _rng: &mut dyn DeterministicRng) -> Result<(), DomainError> {
        if self.mounted {
            return Err(DomainError::InvalidTransition("timeline already mounted".to_owned()));
        }
        self.mounted = true;
        self.record(
            TimelineEventKind::Presented {
                memories: self.script.memories.len(),
            },
            clock,
        );
        Ok(())
    }

    fn handle(
        &mut self,
        input: TimelineInput,
        clock: &dyn Clock,
        _rng: &mut dyn DeterministicRng,
    ) -> Result<(), DomainError> {
        if !self.mounted || self.completed {
            return Err(DomainError::InvalidTransition(
                "timeline is not accepting input".to_owned(),
            ));
        }
        match input {
            TimelineInput::Open(index) => self.open(index, clock)?,
            TimelineInput::Close => self.close(clock),
            TimelineInput::Proceed => {
                self.close(clock);
                self.completed = true;
                info!("timeline completed");
                self.record(TimelineEventKind::StageCompleted, clock);
            }
        }
        Ok(())
    }

    fn now(&self) -> Millis {
        self.now
    }

    fn next_deadline(&self) -> Option<Millis> {
        None
    }

    fn advance_to(&mut self, until: Millis, _clock: &dyn Clock, _rng: &mut dyn DeterministicRng) {
        self.now = self.now.max(until);
    }

    fn uncommitted_events(&self) -> &[TimelineEvent] {
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
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::event::{DomainEvent, StageSignal};
    use valentine_test_support::{MockRng, fixed_clock};

    fn memory(title: &str, description: &str, wide: bool) -> Memory {
        Memory {
            title: title.to_owned(),
            description: description.to_owned(),
            emoji: "💕".to_owned(),
            photo: None,
            caption: None,
            wide,
        }
    }

    fn mounted() -> Timeline {
        let script = TimelineScript {
            memories: vec![
                memory("The Day We Met", "It was a dark, quiet day.", false),
                memory("My favorite Date", "Dinner.\n\nLight rail home.", true),
            ],
            ..TimelineScript::default()
        };
        let mut timeline = Timeline::new(script);
        timeline.mount(&fixed_clock(), &mut MockRng).unwrap();
        timeline
    }

    fn send(timeline: &mut Timeline, input: TimelineInput) -> Result<(), DomainError> {
        timeline.handle(input, &fixed_clock(), &mut MockRng)
    }

    #[test]
    fn test_open_selects_memory_and_sizes_modal() {
        let mut timeline = mounted();

        send(&mut timeline, TimelineInput::Open(1)).unwrap();

        let (index, memory) = timeline.selected().unwrap();
        assert_eq!(index, 1);
        assert_eq!(memory.title, "My favorite Date");
        assert_eq!(timeline.modal_width(), 900);
    }

    #[test]
    fn test_close_returns_to_default_width() {
        let mut timeline = mounted();
        send(&mut timeline, TimelineInput::Open(0)).unwrap();

        send(&mut timeline, TimelineInput::Close).unwrap();

        assert!(timeline.selected().is_none());
        assert_eq!(timeline.modal_width(), 600);
    }

    #[test]
    fn test_open_out_of_range_is_rejected() {
        let mut timeline = mounted();

        let result = send(&mut timeline, TimelineInput::Open(5));

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(timeline.selected().is_none());
    }

    #[test]
    fn test_proceed_completes_once() {
        // Arrange
        let mut timeline = mounted();
        send(&mut timeline, TimelineInput::Open(0)).unwrap();

        // Act
        send(&mut timeline, TimelineInput::Proceed).unwrap();
        let again = send(&mut timeline, TimelineInput::Proceed);

        // Assert
        assert!(again.is_err());
        assert!(timeline.is_complete());
        let events = timeline.take_events();
        let kinds: Vec<&str> = events.iter().map(DomainEvent::event_type).collect();
        assert_eq!(
            kinds,
            vec![
                "timeline.presented",
                "timeline.memory_opened",
                "timeline.memory_closed",
                "timeline.stage_completed",
            ]
        );
        assert_eq!(events.last().unwrap().signal(), Some(StageSignal::Complete));
    }
}
