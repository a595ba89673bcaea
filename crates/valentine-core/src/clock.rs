//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Abstraction over wall-clock time.
///
/// Screens measure their own progress in virtual milliseconds (see
/// [`crate::scheduler`]); the wall clock only stamps events and seeds the
/// production RNG.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the Unix epoch, clamped at zero.
    fn epoch_millis(&self) -> u64 {
        u64::try_from(self.now().timestamp_millis()).unwrap_or(0)
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct At(DateTime<Utc>);

    impl Clock for At {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_epoch_millis_matches_timestamp() {
        let clock = At(Utc.with_ymd_and_hms(2026, 2, 14, 9, 0, 0).unwrap());

        assert_eq!(clock.epoch_millis(), 1_771_059_600_000);
    }

    #[test]
    fn test_epoch_millis_clamps_pre_epoch_times() {
        let clock = At(Utc.with_ymd_and_hms(1969, 12, 31, 0, 0, 0).unwrap());

        assert_eq!(clock.epoch_millis(), 0);
    }
}
