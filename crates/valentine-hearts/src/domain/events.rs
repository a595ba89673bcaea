//! Domain events for the heart-catching mini-game.

use serde::Serialize;
use valentine_core::event::{DomainEvent, EventMetadata, StageSignal};
use valentine_core::geometry::Point;

use crate::domain::burst::Burst;

/// Emitted when a pending heart is caught.
#[derive(Debug, Clone, Serialize)]
pub struct HeartCaught {
    /// The heart's id.
    pub heart: usize,
    /// Its message.
    pub message: String,
    /// Where the message is shown, percent.
    pub position: Point,
    /// Hearts caught so far, this one included.
    pub caught: usize,
    /// Hearts still pending.
    pub remaining: usize,
}

/// Event payload variants for the mini-game.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HeartsEventKind {
    /// The hearts are on screen.
    Presented {
        /// Number of hearts.
        hearts: usize,
    },
    /// A heart was caught.
    HeartCaught(HeartCaught),
    /// A caught heart burst into droplets.
    BurstSpawned(Burst),
    /// A burst finished and was removed.
    BurstCleared {
        /// The burst removed.
        burst: u64,
    },
    /// The message was dismissed.
    MessageDismissed,
    /// Every heart has been caught.
    AllHeartsCaught {
        /// Completion notice.
        message: String,
    },
    /// The mini-game is over.
    StageCompleted,
}

impl HeartsEventKind {
    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Presented { .. } => "hearts.presented",
            Self::HeartCaught(_) => "hearts.heart_caught",
            Self::BurstSpawned(_) => "hearts.burst_spawned",
            Self::BurstCleared { .. } => "hearts.burst_cleared",
            Self::MessageDismissed => "hearts.message_dismissed",
            Self::AllHeartsCaught { .. } => "hearts.all_caught",
            Self::StageCompleted => "hearts.stage_completed",
        }
    }
}

/// Domain event envelope for the mini-game.
#[derive(Debug, Clone)]
pub struct HeartsEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: HeartsEventKind,
}

impl DomainEvent for HeartsEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("HeartsEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn signal(&self) -> Option<StageSignal> {
        matches!(self.kind, HeartsEventKind::StageCompleted).then_some(StageSignal::Complete)
    }
}
