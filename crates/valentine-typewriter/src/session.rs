//! A single reveal session: one target string, one cursor.

use crate::policy::DelayPolicy;

/// One run of the typewriter over a specific target string.
///
/// The cursor counts Unicode scalar values, never bytes, and only moves
/// forward.
#[derive(Debug, Clone)]
pub struct RevealSession {
    id: u64,
    text: String,
    policy: DelayPolicy,
    len: usize,
    cursor: usize,
    revealed_bytes: usize,
    last: Option<char>,
    completed: bool,
}

impl RevealSession {
    /// Creates a session at cursor zero.
    #[must_use]
    pub fn new(id: u64, text: &str, policy: DelayPolicy) -> Self {
        Self {
            id,
            text: text.to_owned(),
            policy,
            len: text.chars().count(),
            cursor: 0,
            revealed_bytes: 0,
            last: None,
            completed: false,
        }
    }

    /// Session identifier (the revealer's generation counter).
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The full target string.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The delay policy this session was started with.
    #[must_use]
    pub fn policy(&self) -> DelayPolicy {
        self.policy
    }

    /// Characters revealed so far.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the target in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the target string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The revealed prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.text[..self.revealed_bytes]
    }

    /// Whether the completion has been reported.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Reveals the next character, returning it together with the character
    /// revealed before it. `None` once the whole string is shown.
    pub fn reveal_next(&mut self) -> Option<(Option<char>, char)> {
        let next = self.text[self.revealed_bytes..].chars().next()?;
        let previous = self.last.replace(next);
        self.revealed_bytes += next.len_utf8();
        self.cursor += 1;
        Some((previous, next))
    }

    /// Marks the session complete. Returns `false` if it already was.
    pub fn complete(&mut self) -> bool {
        !std::mem::replace(&mut self.completed, true)
    }
}
