//! Mapping between virtual screen time and real time.

use std::time::Duration;

use valentine_core::scheduler::Millis;

/// Slowest accepted speed factor.
pub const MIN_SPEED: f64 = 0.01;

/// Fastest accepted speed factor.
pub const MAX_SPEED: f64 = 1_000.0;

/// How fast virtual time runs on the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pace {
    /// Virtual time runs `speed` times faster than real time.
    Speed(f64),
    /// Every wait is skipped.
    Instant,
}

impl Pace {
    /// Real time to wait for `virtual_ms` of screen time.
    #[must_use]
    pub fn real_delay(self, virtual_ms: Millis) -> Duration {
        match self {
            Self::Speed(speed) => {
                #[allow(clippy::cast_precision_loss)]
                let ms = virtual_ms as f64 / speed;
                Duration::try_from_secs_f64(ms / 1_000.0).unwrap_or(Duration::MAX)
            }
            Self::Instant => Duration::ZERO,
        }
    }

    /// Screen time that passes during `real` wall time. Always zero when
    /// instant, so input lands exactly on the current virtual time.
    #[must_use]
    pub fn virtual_elapsed(self, real: Duration) -> Millis {
        match self {
            Self::Speed(speed) => {
                // Float-to-int casts saturate, so absurd speeds pin at the maximum.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let ms = (real.as_secs_f64() * 1_000.0 * speed).floor() as Millis;
                ms
            }
            Self::Instant => 0,
        }
    }
}

impl Default for Pace {
    fn default() -> Self {
        Self::Speed(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_scales_waits_both_ways() {
        let double = Pace::Speed(2.0);

        assert_eq!(double.real_delay(1_500), Duration::from_millis(750));
        assert_eq!(double.virtual_elapsed(Duration::from_millis(750)), 1_500);
    }

    #[test]
    fn test_instant_never_waits_and_never_drifts() {
        assert_eq!(Pace::Instant.real_delay(60_000), Duration::ZERO);
        assert_eq!(Pace::Instant.virtual_elapsed(Duration::from_secs(3)), 0);
    }

    #[test]
    fn test_extreme_speeds_do_not_panic() {
        let crawling = Pace::Speed(1e-300);
        let racing = Pace::Speed(1e300);

        assert_eq!(crawling.real_delay(1_500), Duration::MAX);
        assert_eq!(racing.real_delay(1_500), Duration::ZERO);
        assert_eq!(racing.virtual_elapsed(Duration::from_millis(1)), Millis::MAX);
    }

    #[test]
    fn test_default_is_real_time() {
        assert_eq!(Pace::default().real_delay(250), Duration::from_millis(250));
    }
}
