//! Domain events for the choice and proposal screens.

use serde::Serialize;
use valentine_core::event::{DomainEvent, EventMetadata, StageSignal};
use valentine_core::geometry::Point;

use crate::domain::placement::Placement;
use crate::domain::proposal::ProposalPhase;

/// Event payload variants for the choice screen.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChoiceEventKind {
    /// A step is showing.
    StepShown {
        /// Step index.
        step: usize,
        /// The question.
        text: String,
    },
    /// A button's result is showing.
    ResultShown {
        /// The result text.
        text: String,
    },
    /// The result went away.
    ResultHidden,
    /// The choice screen is over.
    StageCompleted,
}

impl ChoiceEventKind {
    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::StepShown { .. } => "choice.step_shown",
            Self::ResultShown { .. } => "choice.result_shown",
            Self::ResultHidden => "choice.result_hidden",
            Self::StageCompleted => "choice.stage_completed",
        }
    }
}

/// Domain event envelope for the choice screen.
#[derive(Debug, Clone)]
pub struct ChoiceEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ChoiceEventKind,
}

impl DomainEvent for ChoiceEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ChoiceEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn signal(&self) -> Option<StageSignal> {
        matches!(self.kind, ChoiceEventKind::StageCompleted).then_some(StageSignal::Complete)
    }
}

/// One heart flying out of the celebration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Confetti {
    /// Horizontal travel in pixels.
    pub dx: f64,
    /// Vertical travel in pixels.
    pub dy: f64,
    /// Launch delay.
    pub delay_ms: u64,
}

/// What is shown once the proposal is accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Celebration {
    /// Heading.
    pub title: String,
    /// Line under the heading.
    pub message: String,
    /// Footer.
    pub footer: String,
    /// Flying hearts.
    pub confetti: Vec<Confetti>,
}

/// Emitted when the no button dodges the pointer.
#[derive(Debug, Clone, Serialize)]
pub struct NoButtonMoved {
    /// Pointer sample that triggered the move.
    pub pointer: Point,
    /// Where the button went.
    pub placement: Placement,
}

/// Event payload variants for the proposal screen.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProposalEventKind {
    /// A reveal phase was entered.
    PhaseEntered {
        /// The phase.
        phase: ProposalPhase,
    },
    /// The star field should start turning pink.
    PinkStarsStarted,
    /// The no button moved away from the pointer.
    NoButtonMoved(NoButtonMoved),
    /// Yes was pressed.
    ProposalAccepted(Celebration),
    /// The proposal is over.
    StageCompleted,
}

impl ProposalEventKind {
    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::PhaseEntered { .. } => "proposal.phase_entered",
            Self::PinkStarsStarted => "proposal.pink_stars_started",
            Self::NoButtonMoved(_) => "proposal.no_button_moved",
            Self::ProposalAccepted(_) => "proposal.accepted",
            Self::StageCompleted => "proposal.stage_completed",
        }
    }
}

/// Domain event envelope for the proposal screen.
#[derive(Debug, Clone)]
pub struct ProposalEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ProposalEventKind,
}

impl DomainEvent for ProposalEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ProposalEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn signal(&self) -> Option<StageSignal> {
        match self.kind {
            ProposalEventKind::PinkStarsStarted => Some(StageSignal::PinkStarsStart),
            ProposalEventKind::StageCompleted => Some(StageSignal::Complete),
            _ => None,
        }
    }
}
