//! Memories and the timeline script.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

const WIDE_MODAL_PX: u32 = 900;
const MIN_MODAL_PX: u32 = 600;
const MAX_MODAL_PX: u32 = 820;
const PX_PER_CHAR: f64 = 2.2;

/// One entry on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    /// Card heading.
    pub title: String,
    /// Markdown body.
    pub description: String,
    /// Emoji on the card.
    #[serde(default)]
    pub emoji: String,
    /// Photo reference, if any.
    #[serde(default)]
    pub photo: Option<String>,
    /// Line under the photo.
    #[serde(default)]
    pub caption: Option<String>,
    /// Always open at full width.
    #[serde(default)]
    pub wide: bool,
}

impl Memory {
    /// The body split into plain-text paragraphs. Every text block counts:
    /// list items keep their number, and headings and code blocks are kept
    /// as plain paragraphs.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Option<String> = None;
        // Next number of each open list; `None` for bullet lists.
        let mut lists: Vec<Option<u64>> = Vec::new();
        // An item has opened but no text has landed in it yet.
        let mut bare_item = false;
        for event in Parser::new(&self.description) {
            match event {
                Event::Start(Tag::List(first)) => lists.push(first),
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                }
                Event::Start(Tag::Item) => {
                    let marker = match lists.last_mut() {
                        Some(Some(number)) => {
                            *number += 1;
                            format!("{}. ", *number - 1)
                        }
                        _ => String::new(),
                    };
                    flush(&mut paragraphs, current.replace(marker));
                    bare_item = true;
                }
                Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_)) => {
                    // A loose item's first paragraph continues the item's marker.
                    if !bare_item {
                        flush(&mut paragraphs, current.replace(String::new()));
                    }
                    bare_item = false;
                }
                Event::End(
                    TagEnd::Paragraph | TagEnd::Item | TagEnd::Heading(_) | TagEnd::CodeBlock,
                ) => {
                    flush(&mut paragraphs, current.take());
                    bare_item = false;
                }
                Event::Text(text) | Event::Code(text) => {
                    bare_item = false;
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push_str(&text);
                    }
                }
                Event::SoftBreak => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push(' ');
                    }
                }
                Event::HardBreak => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push('\n');
                    }
                }
                _ => {}
            }
        }
        paragraphs
    }

    /// Width of the open memory, in pixels.
    #[must_use]
    pub fn modal_width(&self) -> u32 {
        if self.wide {
            return WIDE_MODAL_PX;
        }
        let longest = self
            .paragraphs()
            .iter()
            .map(|paragraph| paragraph.chars().count())
            .max()
            .unwrap_or(0);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let width = (longest as f64 * PX_PER_CHAR).ceil() as u32;
        width.clamp(MIN_MODAL_PX, MAX_MODAL_PX)
    }
}

fn flush(paragraphs: &mut Vec<String>, block: Option<String>) {
    if let Some(block) = block {
        let text = block.trim();
        if !text.is_empty() {
            paragraphs.push(text.to_owned());
        }
    }
}

/// Modal width when no memory is open.
pub const CLOSED_MODAL_PX: u32 = MIN_MODAL_PX;

/// Everything configurable about the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineScript {
    /// Heading.
    pub title: String,
    /// Shown above the continue button.
    pub prompt: String,
    /// Label of the continue button.
    pub continue_label: String,
    /// Memories, oldest first.
    pub memories: Vec<Memory>,
}

impl Default for TimelineScript {
    fn default() -> Self {
        Self {
            title: "Our Story".to_owned(),
            prompt: "So... ready to continue?".to_owned(),
            continue_label: "Continue".to_owned(),
            memories: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(description: &str) -> Memory {
        Memory {
            title: "The Day We Met".to_owned(),
            description: description.to_owned(),
            emoji: "✨".to_owned(),
            photo: None,
            caption: None,
            wide: false,
        }
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let memory = memory("First line\nstill first.\n\nSecond *with* emphasis.");

        assert_eq!(
            memory.paragraphs(),
            vec!["First line still first.", "Second with emphasis."]
        );
    }

    #[test]
    fn test_list_items_and_headings_are_kept() {
        let memory = memory("We met.\n\n2025. The bus to the dunes.\n\n# Ketura\n\n- dunes");

        assert_eq!(
            memory.paragraphs(),
            vec!["We met.", "2025. The bus to the dunes.", "Ketura", "dunes"]
        );
    }

    #[test]
    fn test_nested_list_keeps_the_outer_item_text() {
        let memory = memory("- sunset\n  - sand");

        assert_eq!(memory.paragraphs(), vec!["sunset", "sand"]);
    }

    #[test]
    fn test_loose_numbered_items_keep_their_number() {
        let memory = memory("1. First we talked.\n\n2. Then we walked.");

        assert_eq!(
            memory.paragraphs(),
            vec!["1. First we talked.", "2. Then we walked."]
        );
    }

    #[test]
    fn test_list_text_counts_toward_width() {
        let long = format!("- {}", "dunes ".repeat(60));

        assert!(memory(&long).modal_width() > 600);
    }

    #[test]
    fn test_short_memory_uses_minimum_width() {
        assert_eq!(memory("Short.").modal_width(), 600);
    }

    #[test]
    fn test_width_grows_with_longest_paragraph() {
        // 300 chars * 2.2 = 660.
        let memory = memory(&format!("{}\n\nshort", "a".repeat(300)));

        assert_eq!(memory.modal_width(), 660);
    }

    #[test]
    fn test_width_is_capped() {
        assert_eq!(memory(&"b".repeat(1_000)).modal_width(), 820);
    }

    #[test]
    fn test_wide_memory_ignores_text_length() {
        let mut memory = memory("tiny");
        memory.wide = true;

        assert_eq!(memory.modal_width(), 900);
    }
}
