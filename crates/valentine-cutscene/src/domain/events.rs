//! Domain events for the cutscene.

use serde::Serialize;
use valentine_core::event::{DomainEvent, EventMetadata, StageSignal};

use crate::domain::phase::{Backdrop, CutscenePhase};
use crate::domain::stars::ShootingStar;

/// Emitted whenever the cutscene moves to a new phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseEntered {
    /// The phase entered.
    pub phase: CutscenePhase,
    /// What to draw behind it.
    pub backdrop: Backdrop,
}

/// Emitted each time the typed line grows.
#[derive(Debug, Clone, Serialize)]
pub struct TextRevealed {
    /// The visible text.
    pub prefix: String,
    /// Characters visible.
    pub cursor: usize,
}

/// Event payload variants for the cutscene.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CutsceneEventKind {
    /// A new phase was entered.
    PhaseEntered(PhaseEntered),
    /// More of the current line is visible.
    TextRevealed(TextRevealed),
    /// The current line finished typing.
    TextCompleted {
        /// The full line.
        text: String,
    },
    /// The typing cursor blinked.
    CursorToggled {
        /// Whether the cursor is visible.
        visible: bool,
    },
    /// The star field should start.
    StarsStarted,
    /// A shooting star crossed the sky.
    ShootingStarLaunched(ShootingStar),
    /// The cutscene is over.
    StageCompleted,
}

impl CutsceneEventKind {
    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::PhaseEntered(_) => "cutscene.phase_entered",
            Self::TextRevealed(_) => "cutscene.text_revealed",
            Self::TextCompleted { .. } => "cutscene.text_completed",
            Self::CursorToggled { .. } => "cutscene.cursor_toggled",
            Self::StarsStarted => "cutscene.stars_started",
            Self::ShootingStarLaunched(_) => "cutscene.shooting_star_launched",
            Self::StageCompleted => "cutscene.stage_completed",
        }
    }
}

/// Domain event envelope for the cutscene.
#[derive(Debug, Clone)]
pub struct CutsceneEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CutsceneEventKind,
}

impl DomainEvent for CutsceneEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("CutsceneEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn signal(&self) -> Option<StageSignal> {
        match self.kind {
            CutsceneEventKind::StarsStarted => Some(StageSignal::StarsStart),
            CutsceneEventKind::StageCompleted => Some(StageSignal::Complete),
            _ => None,
        }
    }
}
