//! Domain model for the heart-catching mini-game.

pub mod burst;
pub mod events;
pub mod screen;
pub mod script;
