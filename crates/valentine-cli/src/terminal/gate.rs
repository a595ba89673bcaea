use valentine_core::screen::Screen;
use valentine_gate::domain::events::{GateEvent, GateEventKind};
use valentine_gate::domain::screen::{Gate, GateInput};
use valentine_gate::domain::script::{AnswerKind, Question};

use super::{Frame, Interactive};

const SUBMIT_WORDS: [&str; 3] = ["unlock", "submit", "enter"];

fn unanswered(gate: &Gate) -> Vec<&Question> {
    gate.questions()
        .iter()
        .filter(|q| gate.answer(&q.id).is_none())
        .collect()
}

fn answer(question: &Question, value: &str) -> GateInput {
    GateInput::Answer {
        question_id: question.id.clone(),
        value: value.to_owned(),
    }
}

/// Plain lines fill the next empty field, and the line filling the last
/// empty field also submits. `<field> <value>` rewrites a field and
/// `unlock` submits as is.
impl Interactive for Gate {
    fn prompt(&self) -> Option<String> {
        if self.is_unlocked() {
            return None;
        }
        let prompt = match unanswered(self).first() {
            Some(q) if q.kind == AnswerKind::Date => format!("{} (YYYY-MM-DD)", q.label),
            Some(q) => q.label.clone(),
            None => "Type `<field> <answer>` to change an answer, or `unlock`.".to_owned(),
        };
        Some(prompt)
    }

    fn parse(&self, line: &str) -> Result<Vec<GateInput>, String> {
        let line = line.trim();
        if SUBMIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
            return Ok(vec![GateInput::Submit]);
        }
        if let Some((head, rest)) = line.split_once(char::is_whitespace) {
            if let Some(question) = self.script().question(head) {
                return Ok(vec![answer(question, rest.trim())]);
            }
        }
        if let [only] = self.questions() {
            return Ok(vec![answer(only, line), GateInput::Submit]);
        }
        match unanswered(self).as_slice() {
            [] => Err(format!(
                "Fields: {}. Type `<field> <answer>` or `unlock`.",
                self.questions()
                    .iter()
                    .map(|q| q.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            [last] => Ok(vec![answer(last, line), GateInput::Submit]),
            [next, ..] => Ok(vec![answer(next, line)]),
        }
    }

    fn render(&self, event: &GateEvent) -> Vec<Frame> {
        match &event.kind {
            GateEventKind::Presented { .. } => {
                let script = self.script();
                let mut frames = vec![Frame::line(&script.title)];
                if let Some(hint) = &script.hint {
                    frames.push(Frame::line(hint));
                }
                frames
            }
            GateEventKind::AnswersRejected { message, .. } => vec![Frame::line(message)],
            GateEventKind::GateUnlocked => {
                let message = self.script().unlocked_message.as_deref().unwrap_or("Unlocked.");
                vec![Frame::line(message)]
            }
            GateEventKind::AnswerRecorded { .. }
            | GateEventKind::ErrorCleared
            | GateEventKind::StageCompleted => Vec::new(),
        }
    }
}
