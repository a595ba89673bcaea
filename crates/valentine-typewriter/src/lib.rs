//! Valentine — randomized typewriter text revealer.
//!
//! Reveals a string one character at a time with human-looking timing:
//! punctuation pauses, occasional "thinking" pauses between words, slower
//! common letters, and random stutter. The revealer is a component, not a
//! screen: the owning screen lends it a scheduler and wraps the updates it
//! returns into its own events.

pub mod policy;
pub mod revealer;
pub mod session;

pub use policy::DelayPolicy;
pub use revealer::{Typewriter, TypewriterTimer, TypewriterUpdate};
