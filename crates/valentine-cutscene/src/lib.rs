//! Valentine — the lights-out cutscene.
//!
//! A fixed path of phases: the room goes dark, a line is typed out, the
//! screen flashes white, the narrator complains, the lights come back down
//! and the star field starts. Text phases wait for the typewriter; the rest
//! wait a fixed delay.

pub mod domain;
