//! Initial-state builders for the two particle families

use crate::physics::diagnostics;
use crate::physics::forces::ForceLaw;
use crate::physics::math::{Real, SimVector, Vector};
use crate::physics::particles::{Body, ChainParticle};
use rand::Rng;
use std::f64::consts::TAU;

/// Evenly spaced chain from `start` to `end` with both ends anchored.
pub fn straight_chain<S: Real>(count: usize, start: Vector<S>, end: Vector<S>) -> Vec<ChainParticle<S>> {
    let segments = S::from_usize(count.saturating_sub(1).max(1));
    let last = count.saturating_sub(1);

    (0..count)
        .map(|i| {
            let position = start + (end - start) * (S::from_usize(i) / segments);
            ChainParticle::new(position, i != 0 && i != last)
        })
        .collect()
}

/// Settings for [`random_disc`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscSettings {
    /// Mass of the body fixed at the origin
    pub central_mass: f64,
    /// Radius of the disc the other bodies are scattered over
    pub max_radius: f64,
    /// Upper bound of the integer masses
    pub max_mass: u32,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for DiscSettings {
    fn default() -> Self {
        Self {
            central_mass: 5000.0,
            max_radius: 0.8,
            max_mass: 5,
            min_speed: 0.3,
            max_speed: 1.2,
        }
    }
}

/// A heavy central body plus `count - 1` bodies spread uniformly over a disc
/// in the `z = 0` plane.
///
/// Every orbiting body gets an integer mass in `[1, max_mass]` and a
/// clockwise tangential velocity with speed in `[min_speed, max_speed)`.
pub fn random_disc<S: Real, R: Rng + ?Sized>(count: usize, settings: &DiscSettings, rng: &mut R) -> Vec<Body<S>> {
    if count == 0 {
        return Vec::new();
    }

    let mut bodies = Vec::with_capacity(count);
    bodies.push(Body::new(
        S::from_f64(settings.central_mass),
        Vector::<S>::ZERO,
        Vector::<S>::ZERO,
    ));

    let max_mass = settings.max_mass.max(1);
    let half_square_radius = 0.5 * settings.max_radius * settings.max_radius;

    for _ in 1..count {
        let mass = f64::from(rng.random_range(1..=max_mass));

        // sqrt of a uniform variate gives uniform density over the area
        let radius = libm::sqrt(2.0 * rng.random_range(0.0..half_square_radius));
        let angle = rng.random_range(0.0..TAU);
        let (x, y) = (radius * libm::cos(angle), radius * libm::sin(angle));

        let speed = rng.random_range(settings.min_speed..settings.max_speed);
        let (vx, vy) = if radius > 0.0 {
            (speed * y / radius, -speed * x / radius)
        } else {
            (0.0, 0.0)
        };

        bodies.push(Body::new(
            S::from_f64(mass),
            Vector::<S>::new(S::from_f64(x), S::from_f64(y), S::ZERO),
            Vector::<S>::new(S::from_f64(vx), S::from_f64(vy), S::ZERO),
        ));
    }

    bodies
}

/// Relative speed of a circular two-body orbit of radius `separation`
pub fn circular_speed<S: Real>(law: ForceLaw, total_mass: S, gravitational_constant: S, separation: S) -> S {
    match law {
        ForceLaw::Planar => (gravitational_constant * total_mass).sqrt(),
        ForceLaw::InverseSquare => (gravitational_constant * total_mass / separation).sqrt(),
    }
}

/// Period of the orbit built by [`two_body_circular_orbit`]
pub fn circular_period<S: Real>(law: ForceLaw, total_mass: S, gravitational_constant: S, separation: S) -> S {
    S::from_f64(TAU) * separation / circular_speed(law, total_mass, gravitational_constant, separation)
}

/// Two bodies on a circular orbit about their common center of mass at the
/// origin, separated along x and moving along y.
pub fn two_body_circular_orbit<S: Real>(
    law: ForceLaw,
    masses: [S; 2],
    gravitational_constant: S,
    separation: S,
) -> Vec<Body<S>> {
    let [m1, m2] = masses;
    let total = m1 + m2;
    let speed = circular_speed(law, total, gravitational_constant, separation);

    let axis = |x: S| Vector::<S>::new(x, S::ZERO, S::ZERO);
    let lateral = |y: S| Vector::<S>::new(S::ZERO, y, S::ZERO);

    vec![
        Body::new(m1, axis(-separation * m2 / total), lateral(-speed * m2 / total)),
        Body::new(m2, axis(separation * m1 / total), lateral(speed * m1 / total)),
    ]
}

/// Shift every velocity so the total momentum is zero.
pub fn remove_net_momentum<S: Real>(bodies: &mut [Body<S>]) {
    let drift = diagnostics::system_velocity(bodies);
    for body in bodies.iter_mut() {
        body.velocity -= drift;
        body.velocity_temp -= drift;
    }
}
