//! Domain events for answer gates.

use serde::Serialize;
use valentine_core::event::{DomainEvent, EventMetadata, StageSignal};

/// Event payload variants for a gate.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GateEventKind {
    /// The gate is showing its questions.
    Presented {
        /// Number of questions.
        questions: usize,
    },
    /// A field value was recorded.
    AnswerRecorded {
        /// The question answered.
        question_id: String,
    },
    /// A submission did not match.
    AnswersRejected {
        /// Message shown to the player.
        message: String,
    },
    /// The rejection message timed out.
    ErrorCleared,
    /// Every answer matched; the gate is fading out.
    GateUnlocked,
    /// The gate is gone.
    StageCompleted,
}

impl GateEventKind {
    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Presented { .. } => "gate.presented",
            Self::AnswerRecorded { .. } => "gate.answer_recorded",
            Self::AnswersRejected { .. } => "gate.answers_rejected",
            Self::ErrorCleared => "gate.error_cleared",
            Self::GateUnlocked => "gate.unlocked",
            Self::StageCompleted => "gate.stage_completed",
        }
    }
}

/// Domain event envelope for a gate.
#[derive(Debug, Clone)]
pub struct GateEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GateEventKind,
}

impl DomainEvent for GateEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GateEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn signal(&self) -> Option<StageSignal> {
        matches!(self.kind, GateEventKind::StageCompleted).then_some(StageSignal::Complete)
    }
}
