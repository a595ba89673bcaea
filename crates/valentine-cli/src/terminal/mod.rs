//! Text presentation of each screen.
//!
//! Every screen gets an [`Interactive`] impl: how to prompt for input, how
//! to turn a typed line into screen input, and how to draw its events. The
//! [`Console`] writes the resulting frames to any `Write`.

mod choice;
mod cutscene;
mod gate;
mod hearts;
mod proposal;
mod timeline;

use std::io::{self, Write};

use valentine_core::screen::Screen;

/// A screen that can be played from a line-oriented terminal.
pub trait Interactive: Screen {
    /// What to ask while input is expected, if anything.
    fn prompt(&self) -> Option<String>;

    /// Turns one typed line into the inputs it stands for.
    ///
    /// # Errors
    ///
    /// Returns a hint for the player when the line means nothing here.
    fn parse(&self, line: &str) -> Result<Vec<Self::Input>, String>;

    /// Frames that draw `event`.
    fn render(&self, event: &Self::Event) -> Vec<Frame>;
}

/// One unit of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A full line.
    Line(String),
    /// Text redrawn in place on the current line.
    Partial(String),
    /// Ends an in-place line, if one is open.
    Break,
}

impl Frame {
    /// A full line.
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }
}

/// Writes frames, keeping track of in-place lines.
#[derive(Debug)]
pub struct Console<W> {
    out: W,
    partial: bool,
}

impl<W: Write> Console<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            partial: false,
        }
    }

    /// Draws one frame and flushes.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn show(&mut self, frame: Frame) -> io::Result<()> {
        match frame {
            Frame::Line(text) => {
                self.end_partial()?;
                writeln!(self.out, "{text}")?;
            }
            Frame::Partial(text) => {
                write!(self.out, "\r{text}")?;
                self.partial = true;
            }
            Frame::Break => self.end_partial()?,
        }
        self.out.flush()
    }

    /// Shows a prompt line.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.show(Frame::Line(format!("› {text}")))
    }

    /// Gives the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn end_partial(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.partial) {
            writeln!(self.out)?;
        }
        Ok(())
    }
}

/// Parses a one-based menu number into an index below `len`.
fn menu_index(line: &str, len: usize) -> Option<usize> {
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(frames: Vec<Frame>) -> String {
        let mut console = Console::new(Vec::new());
        for frame in frames {
            console.show(frame).unwrap();
        }
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_partial_lines_are_redrawn_then_closed() {
        let out = printed(vec![
            Frame::Partial("W".into()),
            Frame::Partial("Wa".into()),
            Frame::Break,
            Frame::line("next"),
        ]);

        assert_eq!(out, "\rW\rWa\nnext\n");
    }

    #[test]
    fn test_line_after_partial_starts_fresh() {
        let out = printed(vec![Frame::Partial("typing".into()), Frame::line("done")]);

        assert_eq!(out, "\rtyping\ndone\n");
    }

    #[test]
    fn test_break_without_partial_prints_nothing() {
        assert_eq!(printed(vec![Frame::Break]), "");
    }

    #[test]
    fn test_menu_index_is_one_based() {
        assert_eq!(menu_index("1", 3), Some(0));
        assert_eq!(menu_index(" 3 ", 3), Some(2));
        assert_eq!(menu_index("0", 3), None);
        assert_eq!(menu_index("4", 3), None);
        assert_eq!(menu_index("two", 3), None);
    }
}
