//! Decorative droplet bursts.

use std::f64::consts::TAU;

use serde::Serialize;
use valentine_core::geometry::Point;
use valentine_core::rng::DeterministicRng;

/// One droplet flying out of a burst, relative to the burst origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Droplet {
    /// Horizontal travel in pixels.
    pub dx: f64,
    /// Vertical travel in pixels.
    pub dy: f64,
    /// Diameter in pixels.
    pub size: f64,
    /// Rotation in degrees.
    pub rotate: f64,
    /// Horizontal stretch factor.
    pub stretch: f64,
}

/// A caught heart bursting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Burst {
    /// Burst identifier, unique within the screen.
    pub id: u64,
    /// Heart position it bursts from, percent.
    pub origin: Point,
    /// The droplets, evenly spread with some wobble.
    pub droplets: Vec<Droplet>,
}

impl Burst {
    /// Sprays `count` droplets around `origin`.
    pub fn spray(id: u64, origin: Point, count: u32, rng: &mut dyn DeterministicRng) -> Self {
        let droplets = (0..count)
            .map(|i| {
                let angle = TAU * f64::from(i) / f64::from(count) + rng.next_f64() * 0.5;
                let distance = 70.0 + rng.next_f64() * 70.0;
                Droplet {
                    dx: angle.cos() * distance,
                    dy: angle.sin() * distance,
                    size: 8.0 + rng.next_f64() * 12.0,
                    rotate: rng.next_f64() * 180.0,
                    stretch: 0.8 + rng.next_f64() * 0.7,
                }
            })
            .collect();
        Self {
            id,
            origin,
            droplets,
        }
    }
}
