use valentine_hearts::domain::events::{HeartsEvent, HeartsEventKind};
use valentine_hearts::domain::screen::{Hearts, HeartsInput};

use super::{Frame, Interactive, menu_index};

impl Interactive for Hearts {
    fn prompt(&self) -> Option<String> {
        if self.is_all_caught() {
            return None;
        }
        let pending: Vec<String> = self
            .pending_hearts()
            .map(|(id, _)| format!("♥{}", id + 1))
            .collect();
        Some(format!("Catch a heart: {}", pending.join("  ")))
    }

    fn parse(&self, line: &str) -> Result<Vec<HeartsInput>, String> {
        menu_index(line, self.script().hearts.len())
            .map(|id| vec![HeartsInput::Catch(id)])
            .ok_or_else(|| "Type the number of a heart.".to_owned())
    }

    fn render(&self, event: &HeartsEvent) -> Vec<Frame> {
        match &event.kind {
            HeartsEventKind::Presented { .. } => vec![Frame::line(&self.script().title)],
            HeartsEventKind::HeartCaught(caught) => vec![Frame::line(format!(
                "💖 {}  ({}/{})",
                caught.message,
                caught.caught,
                caught.caught + caught.remaining
            ))],
            HeartsEventKind::AllHeartsCaught { message } => vec![Frame::line(message)],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use valentine_hearts::domain::script::HeartsScript;

    use super::*;

    #[test]
    fn test_heart_numbers_are_one_based() {
        let hearts = Hearts::new(HeartsScript::default()).unwrap();

        assert_eq!(hearts.parse("6").unwrap(), vec![HeartsInput::Catch(5)]);
        assert!(hearts.parse("7").is_err());
        assert!(hearts.prompt().unwrap().contains("♥1"));
    }
}
