//! Domain event abstractions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::scheduler::Millis;

/// One top-level screen of the experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Identity-verification form.
    Verification,
    /// Single-question unlock gate.
    Puzzle,
    /// Scripted typewriter cutscene.
    Cutscene,
    /// Memory timeline.
    Timeline,
    /// Heart-catching mini-game.
    Hearts,
    /// Choice / advance screen.
    Choice,
    /// Final proposal screen.
    Proposal,
}

impl StageKind {
    /// Stable kebab-case name, as used in card scripts and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Puzzle => "puzzle",
            Self::Cutscene => "cutscene",
            Self::Timeline => "timeline",
            Self::Hearts => "hearts",
            Self::Choice => "choice",
            Self::Proposal => "proposal",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals a screen raises toward the stage router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageSignal {
    /// The screen has concluded; the router moves to the next stage.
    Complete,
    /// The decorative star field should start rendering.
    StarsStart,
    /// The star field should start turning pink.
    PinkStarsStart,
}

/// Metadata attached to every domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name, e.g. `gate.answers_rejected`.
    pub event_type: String,
    /// Stage that produced the event.
    pub stage: StageKind,
    /// Monotonically increasing position within the screen's event stream.
    pub sequence_number: i64,
    /// Virtual time since the screen was mounted.
    pub at_ms: Millis,
    /// Wall-clock time of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for a freshly recorded event.
    #[must_use]
    pub fn new(
        event_type: &'static str,
        stage: StageKind,
        sequence_number: i64,
        at_ms: Millis,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            stage,
            sequence_number,
            at_ms,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// The router-facing signal this event carries, if any.
    fn signal(&self) -> Option<StageSignal> {
        None
    }
}
