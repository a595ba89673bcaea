//! Cutscene phases.

use serde::{Deserialize, Serialize};

/// The phases of the cutscene, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CutscenePhase {
    /// Empty dark screen.
    Dark,
    /// "Wait, where'd the lights go?"
    LightsOutText,
    /// Brief white flash.
    FlashWhite,
    /// "TOO MUCH!!"
    TooMuch,
    /// The complaint stays up on the white screen.
    Subtitle,
    /// Lights go back down.
    BackToDark,
    /// "Now that's better, ..."
    BetterText,
    /// The star field fades in.
    Stars,
    /// Terminal phase.
    Done,
}

/// Background tone behind a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backdrop {
    /// Near-black.
    Dark,
    /// White.
    Light,
    /// Nothing drawn; the star field shows through.
    Transparent,
}

impl CutscenePhase {
    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::LightsOutText => "lights-out-text",
            Self::FlashWhite => "flash-white",
            Self::TooMuch => "too-much",
            Self::Subtitle => "subtitle",
            Self::BackToDark => "back-to-dark",
            Self::BetterText => "better-text",
            Self::Stars => "stars",
            Self::Done => "done",
        }
    }

    /// Background tone for this phase.
    #[must_use]
    pub const fn backdrop(self) -> Backdrop {
        match self {
            Self::FlashWhite | Self::TooMuch | Self::Subtitle => Backdrop::Light,
            Self::Stars | Self::Done => Backdrop::Transparent,
            Self::Dark | Self::LightsOutText | Self::BackToDark | Self::BetterText => Backdrop::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_follows_the_lights() {
        assert_eq!(CutscenePhase::Dark.backdrop(), Backdrop::Dark);
        assert_eq!(CutscenePhase::FlashWhite.backdrop(), Backdrop::Light);
        assert_eq!(CutscenePhase::Subtitle.backdrop(), Backdrop::Light);
        assert_eq!(CutscenePhase::BetterText.backdrop(), Backdrop::Dark);
        assert_eq!(CutscenePhase::Done.backdrop(), Backdrop::Transparent);
    }
}
