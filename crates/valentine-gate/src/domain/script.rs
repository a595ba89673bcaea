//! Gate questions and timings.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use valentine_core::error::DomainError;
use valentine_core::scheduler::Millis;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// What kind of field a question uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Free text.
    #[default]
    Text,
    /// A calendar date, compared in `YYYY-MM-DD` form.
    Date,
}

impl AnswerKind {
    /// Canonical form of a raw field value. Dates in any accepted format
    /// become ISO dates; anything else is only trimmed.
    #[must_use]
    pub fn normalize(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            Self::Text => trimmed.to_owned(),
            Self::Date => DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .map_or_else(|| trimmed.to_owned(), |date| date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// One question on a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Field identifier.
    pub id: String,
    /// Prompt shown next to the field.
    pub label: String,
    /// Field kind.
    #[serde(default)]
    pub kind: AnswerKind,
    /// Expected answer, compared case-insensitively.
    pub answer: String,
}

impl Question {
    /// Builds a question.
    #[must_use]
    pub fn new(id: &str, label: &str, kind: AnswerKind, answer: &str) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            kind,
            answer: answer.to_owned(),
        }
    }

    /// Whether `value` answers this question.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        value.trim().to_lowercase() == self.answer.to_lowercase()
    }
}

/// Everything configurable about a gate. Missing fields fall back to a
/// blank gate, so a script must always list its questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateScript {
    /// Heading.
    pub title: String,
    /// Line under the heading.
    pub hint: Option<String>,
    /// The questions, in display order.
    pub questions: Vec<Question>,
    /// Shown after a wrong submission.
    pub error_message: String,
    /// How long the error stays up.
    pub error_clear_ms: Millis,
    /// Shown once unlocked.
    pub unlocked_message: Option<String>,
    /// Delay from unlocking to completing the stage.
    pub unlock_delay_ms: Millis,
}

impl Default for GateScript {
    fn default() -> Self {
        Self {
            title: String::new(),
            hint: None,
            questions: Vec::new(),
            error_message: "Not quite... try again! ❌".to_owned(),
            error_clear_ms: 2_000,
            unlocked_message: None,
            unlock_delay_ms: 1_000,
        }
    }
}

impl GateScript {
    /// The four-question identity check.
    #[must_use]
    pub fn verification() -> Self {
        Self {
            title: "Hang on, lets check that you're MY Elisheva.".to_owned(),
            hint: Some("Answer these to unlock the story 💖".to_owned()),
            questions: vec![
                Question::new("color", "What's your favorite color?", AnswerKind::Text, "red"),
                Question::new("birthday", "When's your birthday?", AnswerKind::Date, "2007-07-06"),
                Question::new("flower", "What's your favorite flower?", AnswerKind::Text, "panzie"),
                Question::new("lastName", "What's your last name?", AnswerKind::Text, "madnick"),
            ],
            error_message:
                "Either this isn't for you, or you don't even know your own stats. Try again?"
                    .to_owned(),
            error_clear_ms: 2_000,
            unlocked_message: None,
            unlock_delay_ms: 1_000,
        }
    }

    /// The single-question nickname puzzle.
    #[must_use]
    pub fn puzzle() -> Self {
        Self {
            title: "🔒".to_owned(),
            hint: Some("Think about what I call you when you're being adorable...".to_owned()),
            questions: vec![Question::new(
                "nickname",
                "What's my favorite nickname for you?",
                AnswerKind::Text,
                "princess",
            )],
            error_message: "Not quite... try again! ❌".to_owned(),
            error_clear_ms: 2_000,
            unlocked_message: Some("🔓".to_owned()),
            unlock_delay_ms: 2_500,
        }
    }

    /// Looks a question up by id.
    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Checks the gate can be unlocked at all.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if there are no questions, an id
    /// repeats, or an expected answer is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.questions.is_empty() {
            return Err(DomainError::InvalidScript("gate has no questions".to_owned()));
        }
        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(DomainError::InvalidScript(format!(
                    "question {:?} appears more than once",
                    question.id
                )));
            }
            if question.answer.trim().is_empty() {
                return Err(DomainError::InvalidScript(format!(
                    "question {:?} has no answer",
                    question.id
                )));
            }
        }
        Ok(())
    }
}
