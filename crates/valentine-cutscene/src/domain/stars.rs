//! The shooting star that crosses the star field once.

use serde::{Deserialize, Serialize};
use valentine_core::geometry::{Point, Viewport};
use valentine_core::rng::DeterministicRng;

/// A side of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Top side.
    Top,
    /// Bottom side.
    Bottom,
    /// Left side.
    Left,
    /// Right side.
    Right,
}

impl Edge {
    const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// A point just past this edge, `along` percent of the way down it.
    /// Coordinates are in percent of the viewport.
    #[must_use]
    pub fn point(self, along: f64) -> Point {
        match self {
            Self::Top => Point::new(along, -5.0),
            Self::Bottom => Point::new(along, 105.0),
            Self::Left => Point::new(-5.0, along),
            Self::Right => Point::new(105.0, along),
        }
    }
}

/// Start and end of the streak, in viewport percent, plus its heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShootingStar {
    /// Edge the streak enters from.
    pub from: Edge,
    /// Edge the streak leaves by.
    pub to: Edge,
    /// Entry point.
    pub start: Point,
    /// Exit point.
    pub end: Point,
    /// Heading in degrees, measured in pixel space.
    pub angle_deg: f64,
}

impl ShootingStar {
    /// Picks two distinct edges and a point along each.
    pub fn launch(viewport: Viewport, rng: &mut dyn DeterministicRng) -> Self {
        let first = rng.below(4) as usize;
        let offset = 1 + rng.below(3) as usize;
        let from = Edge::ALL[first];
        let to = Edge::ALL[(first + offset) % Edge::ALL.len()];

        let start = from.point(rng.next_f64() * 100.0);
        let end = to.point(rng.next_f64() * 100.0);
        let dx = (end.x - start.x) / 100.0 * viewport.width;
        let dy = (end.y - start.y) / 100.0 * viewport.height;

        Self {
            from,
            to,
            start,
            end,
            angle_deg: dy.atan2(dx).to_degrees(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valentine_core::rng::SeededRng;
    use valentine_test_support::{MockRng, SequenceRng};

    #[test]
    fn test_edges_always_differ() {
        let mut rng = SeededRng::new(5);

        for _ in 0..200 {
            let star = ShootingStar::launch(Viewport::default(), &mut rng);
            assert_ne!(star.from, star.to);
        }
    }

    #[test]
    fn test_constant_rng_still_picks_two_edges() {
        let star = ShootingStar::launch(Viewport::default(), &mut MockRng);

        assert_eq!(star.from, Edge::Top);
        assert_eq!(star.to, Edge::Bottom);
        assert!((star.angle_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_is_measured_in_pixels() {
        // Arrange: top edge at 50%, left edge at 50%.
        let mut rng = SequenceRng::new(vec![0, 1]).with_floats(vec![0.5, 0.5]);

        // Act
        let star = ShootingStar::launch(Viewport::new(1000.0, 1000.0), &mut rng);

        // Assert
        assert_eq!(star.from, Edge::Top);
        assert_eq!(star.to, Edge::Left);
        assert_eq!(star.start, Point::new(50.0, -5.0));
        assert_eq!(star.end, Point::new(-5.0, 50.0));
        assert!((star.angle_deg - 135.0).abs() < 1e-9);
    }
}
