//! Valentine — card scripts.
//!
//! A card script is a YAML document listing the stages to play and the
//! texts, answers and timings of each. An embedded default is always
//! available; a file on disk can replace it.

pub mod card;
pub mod error;
pub mod loader;

pub use card::CardScript;
pub use error::ContentError;
pub use loader::{CardSource, LoadedCard};
