//! Shared helpers for player integration tests.

#![allow(dead_code)]

use valentine_cli::input::ScriptedInput;
use valentine_cli::journey::{self, JourneyReport};
use valentine_cli::pace::Pace;
use valentine_cli::player::{Session, Sky};
use valentine_cli::terminal::Console;
use valentine_content::{CardScript, loader};
use valentine_core::geometry::Viewport;
use valentine_test_support::{MockRng, fixed_clock};

/// Correct answers, in field order.
pub const VERIFICATION: [&str; 4] = ["red", "2007-07-06", "panzie", "madnick"];

/// Open the first memory, close it, move on.
pub const TIMELINE: [&str; 3] = ["1", "", ""];

/// Catch every heart.
pub const HEARTS: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

/// Press the lone button.
pub const CHOICE: [&str; 1] = [""];

/// Chase the no button once, then accept.
pub const PROPOSAL: [&str; 2] = ["no", "yes"];

/// Lines that play the embedded card from start to finish.
pub fn happy_path() -> Vec<&'static str> {
    [
        &VERIFICATION[..],
        &TIMELINE[..],
        &HEARTS[..],
        &CHOICE[..],
        &PROPOSAL[..],
    ]
    .concat()
}

/// The card compiled into the player.
pub fn embedded_card() -> CardScript {
    loader::embedded().unwrap().script
}

/// Plays `card` on `lines` with no real waiting. Returns the report and
/// everything printed.
pub async fn play_card(card: &CardScript, lines: &[&str]) -> (JourneyReport, String) {
    let clock = fixed_clock();
    let mut rng = MockRng;
    let mut session = Session {
        clock: &clock,
        rng: &mut rng,
        pace: Pace::Instant,
        viewport: Viewport::default(),
        sky: Sky::default(),
    };
    let mut input = ScriptedInput::new(lines.iter().copied());
    let mut console = Console::new(Vec::new());

    let report = journey::run(card, &mut session, &mut input, &mut console)
        .await
        .unwrap();

    (report, String::from_utf8(console.into_inner()).unwrap())
}
