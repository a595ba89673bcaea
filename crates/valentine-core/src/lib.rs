//! Valentine Core — shared abstractions.
//!
//! This crate defines the traits and types every stage crate depends on:
//! injectable time and randomness, the event envelope, the virtual-time
//! scheduler that owns timer cancellation, and the phase sequencer. It
//! contains no presentation code.

pub mod clock;
pub mod error;
pub mod event;
pub mod geometry;
pub mod rng;
pub mod scheduler;
pub mod screen;
pub mod sequencer;
