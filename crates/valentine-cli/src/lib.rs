//! Valentine — terminal player.
//!
//! Plays a card script stage by stage on a terminal: virtual time is mapped
//! onto real time at a configurable pace and stdin lines become screen
//! input.

pub mod config;
pub mod error;
pub mod input;
pub mod journey;
pub mod pace;
pub mod player;
pub mod terminal;
