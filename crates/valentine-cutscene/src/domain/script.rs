//! Cutscene lines and timings.

use serde::{Deserialize, Serialize};
use valentine_core::error::DomainError;
use valentine_core::scheduler::Millis;
use valentine_core::sequencer::{PhaseScript, Step};
use valentine_typewriter::DelayPolicy;

use crate::domain::phase::CutscenePhase;

/// A typed line and its base per-character speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// The text to type out.
    pub text: String,
    /// Base milliseconds per character.
    pub speed_ms: u32,
}

impl Line {
    fn new(text: &str, speed_ms: u32) -> Self {
        Self {
            text: text.to_owned(),
            speed_ms,
        }
    }

    /// The delay policy for this line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the speed is zero.
    pub fn policy(&self) -> Result<DelayPolicy, DomainError> {
        DelayPolicy::new(self.speed_ms)
    }
}

/// Everything configurable about the cutscene. Missing fields take the
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutsceneScript {
    /// Typed in the dark.
    pub lights_out: Line,
    /// Typed on the white flash.
    pub too_much: Line,
    /// Typed once the lights are back down.
    pub better: Line,
    /// Time on the empty dark screen.
    pub dark_ms: Millis,
    /// Pause after the first line finishes.
    pub lights_out_settle_ms: Millis,
    /// Length of the white flash.
    pub flash_ms: Millis,
    /// Pause after the complaint finishes typing.
    pub too_much_settle_ms: Millis,
    /// How long the complaint stays up.
    pub subtitle_ms: Millis,
    /// Time in the dark before the last line.
    pub back_to_dark_ms: Millis,
    /// Pause after the last line finishes.
    pub better_settle_ms: Millis,
    /// Time the star field plays before the stage completes.
    pub stars_ms: Millis,
    /// Delay from the star field starting to the shooting star.
    pub shooting_star_delay_ms: Millis,
}

impl Default for CutsceneScript {
    fn default() -> Self {
        Self {
            lights_out: Line::new("Wait, where'd the lights go?", 55),
            too_much: Line::new("TOO MUCH!!", 40),
            better: Line::new("Now that's better, let's do it correctly this time.", 50),
            dark_ms: 1_500,
            lights_out_settle_ms: 800,
            flash_ms: 100,
            too_much_settle_ms: 300,
            subtitle_ms: 2_500,
            back_to_dark_ms: 1_200,
            better_settle_ms: 2_000,
            stars_ms: 5_700,
            shooting_star_delay_ms: 2_800,
        }
    }
}

impl CutsceneScript {
    /// The phase path with this script's timings.
    ///
    /// # Errors
    ///
    /// Never in practice; the path shape is fixed.
    pub fn phase_script(&self) -> Result<PhaseScript<CutscenePhase>, DomainError> {
        PhaseScript::new(vec![
            Step::after(CutscenePhase::Dark, self.dark_ms),
            Step::on_signal(CutscenePhase::LightsOutText, self.lights_out_settle_ms),
            Step::after(CutscenePhase::FlashWhite, self.flash_ms),
            Step::on_signal(CutscenePhase::TooMuch, self.too_much_settle_ms),
            Step::after(CutscenePhase::Subtitle, self.subtitle_ms),
            Step::after(CutscenePhase::BackToDark, self.back_to_dark_ms),
            Step::on_signal(CutscenePhase::BetterText, self.better_settle_ms),
            Step::after(CutscenePhase::Stars, self.stars_ms),
            Step::terminal(CutscenePhase::Done),
        ])
    }

    /// The line typed during `phase`, if it is a text phase.
    #[must_use]
    pub fn line_for(&self, phase: CutscenePhase) -> Option<&Line> {
        match phase {
            CutscenePhase::LightsOutText => Some(&self.lights_out),
            CutscenePhase::TooMuch => Some(&self.too_much),
            CutscenePhase::BetterText => Some(&self.better),
            _ => None,
        }
    }

    /// Checks every line has a usable speed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the first bad line.
    pub fn validate(&self) -> Result<(), DomainError> {
        for line in [&self.lights_out, &self.too_much, &self.better] {
            line.policy().map_err(|_| {
                DomainError::Validation(format!("line {:?} has a zero typing speed", line.text))
            })?;
        }
        Ok(())
    }
}
