//! Startup configuration read from the environment.

use std::path::PathBuf;

use valentine_core::geometry::Viewport;

use crate::error::AppError;
use crate::pace::{MAX_SPEED, MIN_SPEED, Pace};

/// Player settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Card script to load instead of the embedded one.
    pub script: Option<PathBuf>,
    /// RNG seed; drawn from the clock when absent.
    pub seed: Option<u64>,
    /// Time scale.
    pub pace: Pace,
    /// Screen size used for geometry.
    pub viewport: Viewport,
    /// Emit logs as JSON.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            seed: None,
            pace: Pace::default(),
            viewport: Viewport::default(),
            log_json: false,
        }
    }
}

impl Config {
    /// Reads `VALENTINE_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, so tests need not touch the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(path) = lookup("VALENTINE_SCRIPT").filter(|p| !p.trim().is_empty()) {
            config.script = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup("VALENTINE_SEED") {
            let seed = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("VALENTINE_SEED {raw:?}: {e}")))?;
            config.seed = Some(seed);
        }
        if let Some(raw) = lookup("VALENTINE_SPEED") {
            config.pace = parse_pace(&raw)?;
        }
        if let Some(raw) = lookup("VALENTINE_VIEWPORT") {
            config.viewport = parse_viewport(&raw)?;
        }
        if let Some(raw) = lookup("VALENTINE_LOG_JSON") {
            config.log_json = matches!(raw.trim(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}

fn parse_pace(raw: &str) -> Result<Pace, AppError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("instant") {
        return Ok(Pace::Instant);
    }
    match raw.parse::<f64>() {
        Ok(speed) if (MIN_SPEED..=MAX_SPEED).contains(&speed) => Ok(Pace::Speed(speed)),
        _ => Err(AppError::Config(format!(
            "VALENTINE_SPEED must be between {MIN_SPEED} and {MAX_SPEED}, or `instant`, got {raw:?}"
        ))),
    }
}

fn parse_viewport(raw: &str) -> Result<Viewport, AppError> {
    let invalid = || AppError::Config(format!("VALENTINE_VIEWPORT must be WIDTHxHEIGHT, got {raw:?}"));
    let (width, height) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = width.trim().parse().map_err(|_| invalid())?;
    let height: f64 = height.trim().parse().map_err(|_| invalid())?;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(invalid());
    }
    Ok(Viewport::new(width, height))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.pace, Pace::Speed(1.0));
    }

    #[test]
    fn test_reads_every_variable() {
        // Arrange
        let env = lookup(&[
            ("VALENTINE_SCRIPT", "card.yaml"),
            ("VALENTINE_SEED", "2026"),
            ("VALENTINE_SPEED", "instant"),
            ("VALENTINE_VIEWPORT", "390x844"),
            ("VALENTINE_LOG_JSON", "1"),
        ]);

        // Act
        let config = Config::from_lookup(env).unwrap();

        // Assert
        assert_eq!(config.script, Some(PathBuf::from("card.yaml")));
        assert_eq!(config.seed, Some(2026));
        assert_eq!(config.pace, Pace::Instant);
        assert_eq!(config.viewport, Viewport::new(390.0, 844.0));
        assert!(config.log_json);
    }

    #[test]
    fn test_speed_must_be_positive() {
        for raw in ["0", "-1", "fast", "NaN"] {
            let result = Config::from_lookup(lookup(&[("VALENTINE_SPEED", raw)]));

            assert!(matches!(result, Err(AppError::Config(_))), "{raw}");
        }
        let scaled = Config::from_lookup(lookup(&[("VALENTINE_SPEED", "2.5")])).unwrap();
        assert_eq!(scaled.pace, Pace::Speed(2.5));
    }

    #[test]
    fn test_speed_outside_the_supported_range_is_rejected() {
        for raw in ["1e-300", "0.001", "1e300", "inf"] {
            let result = Config::from_lookup(lookup(&[("VALENTINE_SPEED", raw)]));

            assert!(matches!(result, Err(AppError::Config(_))), "{raw}");
        }
        let slowest = Config::from_lookup(lookup(&[("VALENTINE_SPEED", "0.01")])).unwrap();
        let fastest = Config::from_lookup(lookup(&[("VALENTINE_SPEED", "1000")])).unwrap();
        assert_eq!(slowest.pace, Pace::Speed(MIN_SPEED));
        assert_eq!(fastest.pace, Pace::Speed(MAX_SPEED));
    }

    #[test]
    fn test_malformed_seed_and_viewport_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("VALENTINE_SEED", "-4")])).is_err());
        assert!(Config::from_lookup(lookup(&[("VALENTINE_VIEWPORT", "1280")])).is_err());
        assert!(Config::from_lookup(lookup(&[("VALENTINE_VIEWPORT", "0x800")])).is_err());
    }
}
