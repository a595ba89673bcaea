//! Valentine — answer gates.
//!
//! A gate shows a handful of questions and stays locked until every answer
//! matches. Wrong submissions show a message that clears itself; a correct
//! one fades the gate out and completes the stage.

pub mod domain;
