//! Domain events for the memory timeline.

use serde::Serialize;
use valentine_core::event::{DomainEvent, EventMetadata, StageSignal};

/// Event payload variants for the timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEventKind {
    /// The memory cards are showing.
    Presented {
        /// Number of memories.
        memories: usize,
    },
    /// A memory was opened.
    MemoryOpened {
        /// Position in the timeline.
        index: usize,
        /// Its title.
        title: String,
        /// Modal width in pixels.
        modal_width: u32,
    },
    /// The open memory was closed.
    MemoryClosed {
        /// Position in the timeline.
        index: usize,
    },
    /// The player moved on.
    StageCompleted,
}

impl TimelineEventKind {
    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Presented { .. } => "timeline.presented",
            Self::MemoryOpened { .. } => "timeline.memory_opened",
            Self::MemoryClosed { .. } => "timeline.memory_closed",
            Self::StageCompleted => "timeline.stage_completed",
        }
    }
}

/// Domain event envelope for the timeline.
#[derive(Debug, Clone)]
pub struct TimelineEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TimelineEventKind,
}

impl DomainEvent for TimelineEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("TimelineEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn signal(&self) -> Option<StageSignal> {
        matches!(self.kind, TimelineEventKind::StageCompleted).then_some(StageSignal::Complete)
    }
}
