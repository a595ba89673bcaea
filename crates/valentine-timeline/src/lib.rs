//! Valentine — the memory timeline.

pub mod domain;
