use valentine_timeline::domain::events::{TimelineEvent, TimelineEventKind};
use valentine_timeline::domain::memory::Memory;
use valentine_timeline::domain::screen::{Timeline, TimelineInput};

use super::{Frame, Interactive, menu_index};

fn memory_frames(memory: &Memory) -> Vec<Frame> {
    let mut frames = vec![Frame::line(format!("── {} {} ──", memory.emoji, memory.title))];
    frames.extend(memory.paragraphs().into_iter().map(Frame::Line));
    if let Some(photo) = &memory.photo {
        frames.push(Frame::line(format!("[photo: {photo}]")));
    }
    if let Some(caption) = &memory.caption {
        frames.push(Frame::line(format!("  {caption}")));
    }
    frames
}

/// A number opens a memory; an empty line closes the open one, or moves on
/// when none is open.
impl Interactive for Timeline {
    fn prompt(&self) -> Option<String> {
        if self.selected().is_some() {
            return Some("Press enter to close.".to_owned());
        }
        let script = self.script();
        Some(format!(
            "Pick a memory (1-{}), or press enter: {} [{}]",
            script.memories.len(),
            script.prompt,
            script.continue_label
        ))
    }

    fn parse(&self, line: &str) -> Result<Vec<TimelineInput>, String> {
        let line = line.trim();
        if let Some(index) = menu_index(line, self.memories().len()) {
            return Ok(vec![TimelineInput::Open(index)]);
        }
        let open = self.selected().is_some();
        match line.to_lowercase().as_str() {
            "" if open => Ok(vec![TimelineInput::Close]),
            "close" | "back" | "x" => Ok(vec![TimelineInput::Close]),
            "" | "continue" | "next" => Ok(vec![TimelineInput::Proceed]),
            _ => Err(format!("Type a number from 1 to {}.", self.memories().len())),
        }
    }

    fn render(&self, event: &TimelineEvent) -> Vec<Frame> {
        match &event.kind {
            TimelineEventKind::Presented { .. } => {
                let mut frames = vec![Frame::line(&self.script().title)];
                frames.extend(
                    self.memories()
                        .iter()
                        .enumerate()
                        .map(|(i, m)| Frame::line(format!("  {}. {} {}", i + 1, m.emoji, m.title))),
                );
                frames
            }
            TimelineEventKind::MemoryOpened { index, .. } => self
                .memories()
                .get(*index)
                .map(memory_frames)
                .unwrap_or_default(),
            TimelineEventKind::MemoryClosed { .. } | TimelineEventKind::StageCompleted => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use valentine_core::screen::Screen;
    use valentine_test_support::{MockRng, fixed_clock};
    use valentine_timeline::domain::memory::TimelineScript;

    use super::*;

    fn timeline() -> Timeline {
        let script = TimelineScript {
            memories: vec![Memory {
                title: "The Day We Met".into(),
                description: "First line\nstill first.\n\nSecond.".into(),
                emoji: "✨".into(),
                photo: None,
                caption: Some("Last one :)".into()),
                wide: false,
            }],
            ..TimelineScript::default()
        };
        Timeline::new(script)
    }

    #[test]
    fn test_enter_closes_before_it_proceeds() {
        // Arrange
        let mut timeline = timeline();
        timeline.mount(&fixed_clock(), &mut MockRng).unwrap();

        // Act
        let before = timeline.parse("").unwrap();
        timeline.handle(TimelineInput::Open(0), &fixed_clock(), &mut MockRng).unwrap();
        let while_open = timeline.parse("").unwrap();

        // Assert
        assert_eq!(before, vec![TimelineInput::Proceed]);
        assert_eq!(while_open, vec![TimelineInput::Close]);
        assert_eq!(timeline.parse("1").unwrap(), vec![TimelineInput::Open(0)]);
        assert!(timeline.parse("7").is_err());
    }

    #[test]
    fn test_opened_memory_renders_paragraphs_and_caption() {
        let mut timeline = timeline();
        timeline.mount(&fixed_clock(), &mut MockRng).unwrap();
        timeline.take_events();
        timeline.handle(TimelineInput::Open(0), &fixed_clock(), &mut MockRng).unwrap();

        let events = timeline.take_events();
        let frames = timeline.render(&events[0]);

        assert_eq!(
            frames,
            vec![
                Frame::line("── ✨ The Day We Met ──"),
                Frame::line("First line still first."),
                Frame::line("Second."),
                Frame::line("  Last one :)"),
            ]
        );
    }
}
