//! Choice steps and proposal texts.

use serde::{Deserialize, Serialize};
use valentine_core::error::DomainError;
use valentine_core::geometry::Size;
use valentine_core::scheduler::Millis;

/// A button on a choice step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceButton {
    /// Label.
    pub text: String,
    /// Styled as the good option.
    #[serde(default)]
    pub good: bool,
    /// Shown for a while after pressing, if set.
    #[serde(default)]
    pub result: Option<String>,
}

/// One decision step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceStep {
    /// The question.
    pub text: String,
    /// The options.
    pub buttons: Vec<ChoiceButton>,
}

/// Everything configurable about the choice screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceScript {
    /// Steps, in order.
    pub steps: Vec<ChoiceStep>,
    /// Shown under the last step.
    pub hint: String,
    /// How long a result stays up.
    pub result_ms: Millis,
    /// Delay from the last result to completing the stage.
    pub final_delay_ms: Millis,
}

impl Default for ChoiceScript {
    fn default() -> Self {
        Self {
            steps: vec![ChoiceStep {
                text: "You are about to make a very important life decision...".to_owned(),
                buttons: vec![ChoiceButton {
                    text: "Continue".to_owned(),
                    good: true,
                    result: None,
                }],
            }],
            hint: "All paths lead to the same question... 💫".to_owned(),
            result_ms: 5_500,
            final_delay_ms: 500,
        }
    }
}

impl ChoiceScript {
    /// Checks every step can be left.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if there are no steps or a step
    /// has no buttons.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.steps.is_empty() {
            return Err(DomainError::InvalidScript("choice screen has no steps".to_owned()));
        }
        if let Some(step) = self.steps.iter().find(|step| step.buttons.is_empty()) {
            return Err(DomainError::InvalidScript(format!(
                "choice step {:?} has no buttons",
                step.text
            )));
        }
        Ok(())
    }
}

/// Texts, timings and geometry of the proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalScript {
    /// The question.
    pub title: String,
    /// Accept button label.
    pub yes_label: String,
    /// Evasive button label.
    pub no_label: String,
    /// Heading after accepting.
    pub celebration_title: String,
    /// Line under the heading.
    pub celebration_message: String,
    /// Footer under the line.
    pub celebration_footer: String,
    /// Hearts flying out of the celebration.
    pub confetti: u32,
    /// Delay before the stars start turning pink.
    pub pink_stars_delay_ms: Millis,
    /// Pink stars alone before the title shows.
    pub title_delay_ms: Millis,
    /// Title alone before the yes button shows.
    pub yes_delay_ms: Millis,
    /// Yes button alone before the no button shows.
    pub no_delay_ms: Millis,
    /// One animation frame.
    pub frame_ms: Millis,
    /// The no button runs when the pointer is closer than this.
    pub detect_radius: f64,
    /// A new spot must be at least this far from the pointer.
    pub min_distance: f64,
    /// Keep-out margin at the viewport edges.
    pub padding: f64,
    /// Spots tried before settling for the last one.
    pub max_attempts: u32,
    /// Size of the no button.
    pub no_button: Size,
}

impl Default for ProposalScript {
    fn default() -> Self {
        Self {
            title: "Will You Be My Valentine? 💖".to_owned(),
            yes_label: "Yes! 💕".to_owned(),
            no_label: "No".to_owned(),
            celebration_title: "🎉 She Said Yes! 🎉".to_owned(),
            celebration_message: "Best. Valentine's. Ever. 💕✨".to_owned(),
            celebration_footer: "💖💖💖".to_owned(),
            confetti: 20,
            pink_stars_delay_ms: 400,
            title_delay_ms: 3_600,
            yes_delay_ms: 1_500,
            no_delay_ms: 1_000,
            frame_ms: 16,
            detect_radius: 180.0,
            min_distance: 250.0,
            padding: 60.0,
            max_attempts: 11,
            no_button: Size::new(96.0, 48.0),
        }
    }
}

impl ProposalScript {
    /// Checks the geometry is usable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if no spot would ever be tried or
    /// the frame length is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_attempts == 0 {
            return Err(DomainError::InvalidScript(
                "no button needs at least one placement attempt".to_owned(),
            ));
        }
        if self.frame_ms == 0 {
            return Err(DomainError::InvalidScript("frame length must be positive".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_choice_has_single_continue_step() {
        let script = ChoiceScript::default();

        assert_eq!(script.steps.len(), 1);
        assert_eq!(script.steps[0].buttons[0].text, "Continue");
        assert!(script.validate().is_ok());
    }

    #[test]
    fn test_step_without_buttons_is_rejected() {
        let script = ChoiceScript {
            steps: vec![ChoiceStep {
                text: "?".to_owned(),
                buttons: Vec::new(),
            }],
            ..ChoiceScript::default()
        };

        assert!(script.validate().is_err());
    }

    #[test]
    fn test_reveal_adds_up_to_six_and_a_half_seconds() {
        let script = ProposalScript::default();

        let total = script.pink_stars_delay_ms
            + script.title_delay_ms
            + script.yes_delay_ms
            + script.no_delay_ms;

        assert_eq!(total, 6_500);
    }
}
