use std::convert::Infallible;

use valentine_cutscene::domain::events::{CutsceneEvent, CutsceneEventKind};
use valentine_cutscene::domain::phase::CutscenePhase;
use valentine_cutscene::domain::screen::Cutscene;

use super::{Frame, Interactive};

impl Interactive for Cutscene {
    fn prompt(&self) -> Option<String> {
        None
    }

    fn parse(&self, _line: &str) -> Result<Vec<Infallible>, String> {
        Err("Just watch... ✨".to_owned())
    }

    fn render(&self, event: &CutsceneEvent) -> Vec<Frame> {
        match &event.kind {
            CutsceneEventKind::PhaseEntered(entered) if entered.phase == CutscenePhase::FlashWhite => {
                vec![Frame::line("⚡")]
            }
            CutsceneEventKind::TextRevealed(revealed) => vec![Frame::Partial(revealed.prefix.clone())],
            CutsceneEventKind::TextCompleted { text } => vec![Frame::Partial(text.clone()), Frame::Break],
            CutsceneEventKind::StarsStarted => vec![Frame::line("✦   ·   ✧   ·   ✦")],
            CutsceneEventKind::ShootingStarLaunched(_) => vec![Frame::line("        ☄")],
            _ => Vec::new(),
        }
    }
}
