//! Line-oriented input sources.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::AppError;

/// Where the player's lines come from.
#[async_trait]
pub trait InputSource: Send {
    /// The next line without its terminator, or `None` once the source is
    /// exhausted. Must be cancel safe: the player drops the future whenever
    /// a timer fires first.
    async fn next_line(&mut self) -> Result<Option<String>, AppError>;
}

/// Reads lines from the process's standard input.
pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    /// Wraps tokio's stdin in a line reader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for StdinInput {
    async fn next_line(&mut self) -> Result<Option<String>, AppError> {
        Ok(self.lines.next_line().await?)
    }
}

/// Replays a fixed list of lines.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Creates a source that yields `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn next_line(&mut self) -> Result<Option<String>, AppError> {
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_input_yields_lines_then_ends() {
        let mut input = ScriptedInput::new(["red", "submit"]);

        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("red"));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.next_line().await.unwrap().as_deref(), Some("submit"));
        assert_eq!(input.next_line().await.unwrap(), None);
    }
}
