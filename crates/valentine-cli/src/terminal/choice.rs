use valentine_proposal::domain::choice::{ChoiceInput, ChoiceScreen};
use valentine_proposal::domain::events::{ChoiceEvent, ChoiceEventKind};

use super::{Frame, Interactive, menu_index};

/// Buttons are numbered; enter presses the only button of a one-button step.
impl Interactive for ChoiceScreen {
    fn prompt(&self) -> Option<String> {
        if self.result().is_some() {
            return None;
        }
        let step = self.current_step()?;
        let buttons: Vec<String> = step
            .buttons
            .iter()
            .enumerate()
            .map(|(i, b)| format!("[{}] {}", i + 1, b.text))
            .collect();
        let mut prompt = buttons.join("   ");
        if let Some(hint) = self.hint() {
            prompt = format!("{prompt}\n  {hint}");
        }
        Some(prompt)
    }

    fn parse(&self, line: &str) -> Result<Vec<ChoiceInput>, String> {
        let buttons = self.current_step().map_or(0, |step| step.buttons.len());
        if line.trim().is_empty() && buttons == 1 {
            return Ok(vec![ChoiceInput::Choose(0)]);
        }
        menu_index(line, buttons)
            .map(|i| vec![ChoiceInput::Choose(i)])
            .ok_or_else(|| format!("Pick a button from 1 to {buttons}."))
    }

    fn render(&self, event: &ChoiceEvent) -> Vec<Frame> {
        match &event.kind {
            ChoiceEventKind::StepShown { text, .. } | ChoiceEventKind::ResultShown { text } => {
                vec![Frame::line(text)]
            }
            ChoiceEventKind::ResultHidden | ChoiceEventKind::StageCompleted => Vec::new(),
        }
    }
}
