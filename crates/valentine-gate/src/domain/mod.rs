//! Domain model for answer gates.

pub mod events;
pub mod screen;
pub mod script;
