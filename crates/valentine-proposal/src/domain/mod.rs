//! Domain model for the choice and proposal screens.

pub mod choice;
pub mod events;
pub mod placement;
pub mod proposal;
pub mod script;
