//! Valentine — the last two stages.
//!
//! The choice screen walks through one or more decision steps. The proposal
//! screen reveals the question piece by piece and keeps its "No" button out
//! of the pointer's reach until "Yes" is pressed.

pub mod domain;
