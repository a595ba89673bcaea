//! Per-character delay policy.

use serde::{Deserialize, Serialize};
use valentine_core::error::DomainError;
use valentine_core::rng::DeterministicRng;
use valentine_core::scheduler::Millis;

const PAUSE_CHARS: [char; 6] = [',', '.', '?', '!', ':', ';'];
const SLOW_CHARS: [char; 7] = ['a', 'e', 'i', 'o', 'u', 't', 'h'];

const JITTER_SPAN: u32 = 30;
const PUNCTUATION_BASE: u32 = 280;
const PUNCTUATION_SPAN: u32 = 180;
const THINKING_CHANCE: f64 = 0.15;
const THINKING_BASE: u32 = 200;
const THINKING_SPAN: u32 = 250;
const SLOW_EXTRA: u32 = 15;
const BURST_CHANCE: f64 = 0.08;
const HESITATION_CHANCE: f64 = 0.05;
const HESITATION_SPAN: u32 = 120;
const AFTER_PUNCTUATION_BASE: u32 = 150;
const AFTER_PUNCTUATION_SPAN: u32 = 100;

/// Whether `c` earns a long pause.
#[must_use]
pub fn is_pause(c: char) -> bool {
    PAUSE_CHARS.contains(&c)
}

fn is_slow(c: char) -> bool {
    SLOW_CHARS.contains(&c.to_ascii_lowercase())
}

/// Computes how long to wait after revealing a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayPolicy {
    base_speed_ms: u32,
}

impl DelayPolicy {
    /// Creates a policy around a base per-character speed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `base_speed_ms` is zero.
    pub fn new(base_speed_ms: u32) -> Result<Self, DomainError> {
        if base_speed_ms == 0 {
            return Err(DomainError::Validation(
                "typewriter base speed must be positive".to_owned(),
            ));
        }
        Ok(Self { base_speed_ms })
    }

    /// The base per-character speed.
    #[must_use]
    pub fn base_speed_ms(self) -> u32 {
        self.base_speed_ms
    }

    /// Delay to wait after revealing `current`, given the character revealed
    /// before it. Random draws happen in a fixed order so a scripted RNG
    /// reproduces a sequence exactly.
    pub fn delay_for(
        self,
        previous: Option<char>,
        current: char,
        rng: &mut dyn DeterministicRng,
    ) -> Millis {
        let base = self.base_speed_ms;
        let jitter = rng.below(JITTER_SPAN);
        let mut delay = base + jitter;

        if is_pause(current) {
            delay = PUNCTUATION_BASE + rng.below(PUNCTUATION_SPAN);
        } else if current == ' ' {
            if rng.chance(THINKING_CHANCE) {
                delay = THINKING_BASE + rng.below(THINKING_SPAN);
            }
        } else if is_slow(current) {
            delay = base + SLOW_EXTRA + jitter;
        }

        if rng.chance(BURST_CHANCE) {
            delay = delay * 2 / 5;
        } else if rng.chance(HESITATION_CHANCE) {
            delay += rng.below(HESITATION_SPAN);
        }

        if current == ' ' && previous.is_some_and(is_pause) {
            delay = AFTER_PUNCTUATION_BASE + rng.below(AFTER_PUNCTUATION_SPAN);
        }

        Millis::from(delay)
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self { base_speed_ms: 55 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::rng::SeededRng;
    use valentine_test_support::SequenceRng;

    fn policy() -> DelayPolicy {
        DelayPolicy::new(55).unwrap()
    }

    #[test]
    fn test_zero_speed_is_rejected() {
        assert!(DelayPolicy::new(0).is_err());
    }

    #[test]
    fn test_plain_consonant_uses_base_plus_jitter() {
        let mut rng = SequenceRng::new(vec![10]);

        assert_eq!(policy().delay_for(Some('a'), 'b', &mut rng), 65);
    }

    #[test]
    fn test_punctuation_replaces_base_delay() {
        let mut rng = SequenceRng::new(vec![10, 100]);

        assert_eq!(policy().delay_for(Some('o'), ',', &mut rng), 380);
    }

    #[test]
    fn test_space_sometimes_takes_a_thinking_pause() {
        let mut thinking = SequenceRng::new(vec![5, 40]).with_floats(vec![0.1]);
        let mut steady = SequenceRng::new(vec![5]).with_floats(vec![0.2]);

        assert_eq!(policy().delay_for(Some('d'), ' ', &mut thinking), 240);
        assert_eq!(policy().delay_for(Some('d'), ' ', &mut steady), 60);
    }

    #[test]
    fn test_slow_letters_are_case_insensitive() {
        let mut lower = SequenceRng::new(vec![7]);
        let mut upper = SequenceRng::new(vec![7]);

        assert_eq!(policy().delay_for(None, 'h', &mut lower), 77);
        assert_eq!(policy().delay_for(None, 'A', &mut upper), 77);
    }

    #[test]
    fn test_burst_stutter_floors_forty_percent() {
        let mut rng = SequenceRng::new(vec![10]).with_floats(vec![0.01]);

        assert_eq!(policy().delay_for(None, 'b', &mut rng), 26);
    }

    #[test]
    fn test_hesitation_stutter_adds_extra_wait() {
        let mut rng = SequenceRng::new(vec![10, 50]).with_floats(vec![0.5, 0.01]);

        assert_eq!(policy().delay_for(None, 'b', &mut rng), 115);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_space_after_punctuation_overrides_everything() {
        // Thinking pause and burst both fire, then the override wins.
        let mut rng = SequenceRng::new(vec![3, 200, 90]).with_floats(vec![0.0, 0.0]);

        assert_eq!(policy().delay_for(Some('!'), ' ', &mut rng), 240);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_delays_stay_within_policy_bounds() {
        let mut rng = SeededRng::new(2026);
        let policy = policy();
        let text = "Wait, where'd the lights go? TOO MUCH!! Now that's better.";
        let mut previous = None;

        for _ in 0..50 {
            for c in text.chars() {
                let delay = policy.delay_for(previous, c, &mut rng);
                // Smallest: a burst on a bare base delay; largest: a thinking
                // pause plus the longest hesitation.
                assert!(delay >= 22, "{c:?} -> {delay}");
                assert!(delay <= 578, "{c:?} -> {delay}");
                previous = Some(c);
            }
        }
    }
}
