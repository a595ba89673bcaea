//! Domain model for the memory timeline.

pub mod events;
pub mod memory;
pub mod screen;
