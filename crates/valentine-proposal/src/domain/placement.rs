//! Where the no button runs to.

use serde::Serialize;
use valentine_core::geometry::{Point, Size, Viewport};
use valentine_core::rng::DeterministicRng;

/// Bounds for picking a new spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    /// Keep-out margin at the viewport edges.
    pub padding: f64,
    /// A spot must be further than this from the pointer.
    pub min_distance: f64,
    /// Spots tried before settling.
    pub max_attempts: u32,
}

/// A chosen spot for the button's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Top-left corner, in pixels.
    pub position: Point,
    /// Spots tried, this one included.
    pub attempts: u32,
    /// No spot was far enough; the last one tried was kept.
    pub fallback: bool,
}

/// Centre of a button whose top-left corner is at `position`.
#[must_use]
pub fn center_of(position: Point, size: Size) -> Point {
    Point::new(position.x + size.width / 2.0, position.y + size.height / 2.0)
}

/// Picks random spots inside the padded viewport until one is far enough
/// from `pointer`, or the attempts run out.
pub fn reposition(
    pointer: Point,
    viewport: Viewport,
    button: Size,
    rules: PlacementRules,
    rng: &mut dyn DeterministicRng,
) -> Placement {
    let max_x = viewport.width - button.width - rules.padding;
    let max_y = viewport.height - button.height - rules.padding;
    let span_x = (max_x - rules.padding).max(0.0);
    let span_y = (max_y - rules.padding).max(0.0);

    let mut attempts = 0;
    loop {
        attempts += 1;
        let position = Point::new(
            rules.padding + rng.next_f64() * span_x,
            rules.padding + rng.next_f64() * span_y,
        );
        let far_enough = pointer.distance_to(center_of(position, button)) > rules.min_distance;
        if far_enough || attempts >= rules.max_attempts {
            return Placement {
                position,
                attempts,
                fallback: !far_enough,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::rng::SeededRng;
    use valentine_test_support::{MockRng, SequenceRng};

    const RULES: PlacementRules = PlacementRules {
        padding: 60.0,
        min_distance: 250.0,
        max_attempts: 11,
    };
    const BUTTON: Size = Size::new(96.0, 48.0);

    #[test]
    fn test_first_far_spot_is_taken() {
        let placement = reposition(
            Point::new(1_000.0, 700.0),
            Viewport::default(),
            BUTTON,
            RULES,
            &mut MockRng,
        );

        assert_eq!(placement.position, Point::new(60.0, 60.0));
        assert_eq!(placement.attempts, 1);
        assert!(!placement.fallback);
    }

    #[test]
    fn test_near_spots_are_retried() {
        // First spot lands on the pointer, second in the far corner.
        let mut rng = SequenceRng::new(vec![]).with_floats(vec![0.0, 0.0, 0.99, 0.99]);

        let placement = reposition(Point::new(108.0, 84.0), Viewport::default(), BUTTON, RULES, &mut rng);

        assert_eq!(placement.attempts, 2);
        assert!(!placement.fallback);
    }

    #[test]
    fn test_gives_up_after_eleven_attempts() {
        let placement = reposition(
            Point::new(108.0, 84.0),
            Viewport::default(),
            BUTTON,
            RULES,
            &mut MockRng,
        );

        assert_eq!(placement.attempts, 11);
        assert!(placement.fallback);
        assert_eq!(placement.position, Point::new(60.0, 60.0));
    }

    #[test]
    fn test_tiny_viewport_pins_button_to_padding() {
        let mut rng = SeededRng::new(9);

        let placement = reposition(
            Point::new(0.0, 0.0),
            Viewport::new(100.0, 100.0),
            BUTTON,
            RULES,
            &mut rng,
        );

        assert_eq!(placement.position, Point::new(60.0, 60.0));
    }

    #[test]
    fn test_non_fallback_spots_respect_min_distance() {
        let mut rng = SeededRng::new(14);
        let pointer = Point::new(640.0, 400.0);

        for _ in 0..200 {
            let placement = reposition(pointer, Viewport::default(), BUTTON, RULES, &mut rng);
            let distance = pointer.distance_to(center_of(placement.position, BUTTON));
            assert!(placement.fallback || distance > 250.0);
            assert!(placement.position.x >= 60.0 && placement.position.x <= 1_280.0 - 96.0 - 60.0);
            assert!(placement.position.y >= 60.0 && placement.position.y <= 800.0 - 48.0 - 60.0);
        }
    }
}
