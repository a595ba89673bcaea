//! Hearts, messages and timings.

use serde::{Deserialize, Serialize};
use valentine_core::error::DomainError;
use valentine_core::geometry::Point;
use valentine_core::scheduler::Millis;

/// A heart as placed in the script, in percent of the play area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    /// Revealed when caught.
    pub message: String,
    /// Horizontal position, percent. May lie outside `0..=100`.
    pub x: f64,
    /// Vertical position, percent. May lie outside `0..=100`.
    pub y: f64,
}

impl Heart {
    fn new(message: &str, x: f64, y: f64) -> Self {
        Self {
            message: message.to_owned(),
            x,
            y,
        }
    }

    /// Where the message appears: the heart's position pulled inside the
    /// readable part of the play area.
    #[must_use]
    pub fn message_position(&self) -> Point {
        Point::new(self.x.clamp(12.0, 88.0), self.y.clamp(18.0, 82.0))
    }
}

/// Everything configurable about the mini-game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartsScript {
    /// Heading.
    pub title: String,
    /// Shown once every heart is caught.
    pub completion_message: String,
    /// The hearts, in id order.
    pub hearts: Vec<Heart>,
    /// How long a message stays up.
    pub message_ms: Millis,
    /// How long a burst lingers.
    pub burst_ms: Millis,
    /// Droplets per burst.
    pub droplets: u32,
    /// Delay from the last catch to the completion notice.
    pub all_caught_delay_ms: Millis,
    /// Delay from the last catch to completing the stage.
    pub complete_delay_ms: Millis,
}

impl Default for HeartsScript {
    fn default() -> Self {
        Self {
            title: "Catch All the Hearts".to_owned(),
            completion_message: "✨ All hearts collected! ✨".to_owned(),
            hearts: vec![
                Heart::new("Your smile lights up my world", 30.0, 8.0),
                Heart::new("I love talking to you", 0.0, 16.0),
                Heart::new("I miss you when you're not around", 102.0, 26.0),
                Heart::new("You make me laugh like no one else", 24.0, 56.0),
                Heart::new("Being with you completes my day", 58.0, 58.0),
                Heart::new("Your bright energy and dances make me so happy", 80.0, -36.0),
            ],
            message_ms: 3_500,
            burst_ms: 1_200,
            droplets: 20,
            all_caught_delay_ms: 3_700,
            complete_delay_ms: 4_700,
        }
    }
}

impl HeartsScript {
    /// Checks the game can be finished.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScript` if there are no hearts or the
    /// completion would come before the notice.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.hearts.is_empty() {
            return Err(DomainError::InvalidScript("no hearts to catch".to_owned()));
        }
        if self.complete_delay_ms < self.all_caught_delay_ms {
            return Err(DomainError::InvalidScript(
                "hearts complete before the completion notice".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_position_is_clamped_into_view() {
        let script = HeartsScript::default();

        assert_eq!(script.hearts[0].message_position(), Point::new(30.0, 18.0));
        assert_eq!(script.hearts[2].message_position(), Point::new(88.0, 26.0));
        assert_eq!(script.hearts[5].message_position(), Point::new(80.0, 18.0));
        assert_eq!(script.hearts[4].message_position(), Point::new(58.0, 58.0));
    }

    #[test]
    fn test_empty_script_is_rejected() {
        let script = HeartsScript {
            hearts: Vec::new(),
            ..HeartsScript::default()
        };

        assert!(script.validate().is_err());
    }
}
