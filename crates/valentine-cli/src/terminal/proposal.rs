use valentine_core::geometry::Point;
use valentine_proposal::domain::events::{ProposalEvent, ProposalEventKind};
use valentine_proposal::domain::proposal::{Proposal, ProposalInput, ProposalPhase};

use super::{Frame, Interactive};

const CONFETTI_SHOWN: usize = 12;

fn parse_point(line: &str) -> Option<Point> {
    let (x, y) = line.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// `yes` accepts, `no` reaches for the no button, `x,y` moves the pointer.
impl Interactive for Proposal {
    fn prompt(&self) -> Option<String> {
        if self.celebration().is_some() || !self.is_revealed(ProposalPhase::YesButton) {
            return None;
        }
        let script = self.script();
        if self.is_revealed(ProposalPhase::NoButton) {
            Some(format!("[{}]   [{}]   (yes / no)", script.yes_label, script.no_label))
        } else {
            Some(format!("[{}]   (yes)", script.yes_label))
        }
    }

    fn parse(&self, line: &str) -> Result<Vec<ProposalInput>, String> {
        let line = line.trim();
        let lower = line.to_lowercase();
        if matches!(lower.as_str(), "y" | "yes") || lower == self.script().yes_label.to_lowercase() {
            return Ok(vec![ProposalInput::Accept]);
        }
        if matches!(lower.as_str(), "n" | "no") || lower == self.script().no_label.to_lowercase() {
            return Ok(vec![ProposalInput::ReachForNo]);
        }
        parse_point(line)
            .map(|point| vec![ProposalInput::PointerMoved(point)])
            .ok_or_else(|| "Type `yes`, `no`, or a pointer position `x,y`.".to_owned())
    }

    fn render(&self, event: &ProposalEvent) -> Vec<Frame> {
        match &event.kind {
            ProposalEventKind::PhaseEntered {
                phase: ProposalPhase::Title,
            } => vec![Frame::line(&self.script().title)],
            ProposalEventKind::PinkStarsStarted => vec![Frame::line("✧   ·   ✦   ·   ✧")],
            ProposalEventKind::NoButtonMoved(moved) => {
                let at = moved.placement.position;
                vec![Frame::line(format!(
                    "The {} button scoots away to ({:.0}, {:.0})!",
                    self.script().no_label,
                    at.x,
                    at.y
                ))]
            }
            ProposalEventKind::ProposalAccepted(celebration) => vec![
                Frame::line(&celebration.title),
                Frame::line("🎉".repeat(celebration.confetti.len().min(CONFETTI_SHOWN))),
                Frame::line(&celebration.message),
                Frame::line(&celebration.footer),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use valentine_core::geometry::Viewport;
    use valentine_proposal::domain::script::ProposalScript;

    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(ProposalScript::default(), Viewport::default()).unwrap()
    }

    #[test]
    fn test_parses_answers_and_pointer_positions() {
        let proposal = proposal();

        assert_eq!(proposal.parse("YES").unwrap(), vec![ProposalInput::Accept]);
        assert_eq!(proposal.parse("n").unwrap(), vec![ProposalInput::ReachForNo]);
        assert_eq!(
            proposal.parse("640, 400").unwrap(),
            vec![ProposalInput::PointerMoved(Point::new(640.0, 400.0))]
        );
        assert!(proposal.parse("maybe").is_err());
    }

    #[test]
    fn test_no_prompt_before_the_buttons_appear() {
        assert_eq!(proposal().prompt(), None);
    }
}
