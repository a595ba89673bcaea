//! Domain model for the cutscene.

pub mod events;
pub mod phase;
pub mod screen;
pub mod script;
pub mod stars;
