//! Valentine — catch all the hearts.
//!
//! Each heart hides a message. Catching one shows its message for a while
//! and bursts it into droplets; once every heart is caught the stage
//! announces it and completes.

pub mod domain;
