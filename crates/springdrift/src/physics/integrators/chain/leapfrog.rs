//! Position-only Verlet (leapfrog) for spring chains

use crate::physics::boundary::Site;
use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::chain_acceleration;
use crate::physics::integrators::{ChainIntegrator, Integrator};
use crate::physics::math::Real;
use crate::physics::params::ChainParams;
use crate::physics::particles::ChainParticle;

/// Störmer-Verlet over three rotating position snapshots.
///
/// Velocities are never integrated. They are estimated by the backward
/// difference of the two latest snapshots, which also feeds the damping term:
///
/// ```text
/// v(t)     ≈ (p(t) - p(t - dt)) / dt
/// p(t + dt) = p(t) + (p(t) - p(t - dt)) + a dt²
/// ```
///
/// The velocity stored alongside `p(t + dt)` is `(p(t + dt) - p(t)) / dt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Leapfrog;

impl Integrator for Leapfrog {
    fn name(&self) -> &'static str {
        "leapfrog"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["verlet", "position_verlet"]
    }

    fn order(&self) -> usize {
        2
    }

    fn buffering(&self) -> Buffering {
        Buffering::Triple
    }
}

impl<S: Real> ChainIntegrator<S> for Leapfrog {
    /// Synthesize `p(-dt) = p(0) - v(0) dt + ½ g dt²` for free interior
    /// particles. Edge and anchored particles keep `p(0)`.
    fn bootstrap(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let dt = params.dt;
        let count = params.particle_count;
        let (current, previous) = (buffers.current_index(), buffers.previous_index());

        buffers.dispatch([current], previous, |i, [state]| {
            let particle = state[i];
            if !particle.is_free() || !Site::of(i, count).is_interior() {
                return particle;
            }

            ChainParticle {
                position: particle.position - particle.velocity * dt
                    + params.gravity * (S::HALF * dt * dt),
                ..particle
            }
        });
    }

    fn step(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let dt = params.dt;
        let (previous, current, next) = (
            buffers.previous_index(),
            buffers.current_index(),
            buffers.next_index(),
        );

        buffers.dispatch([previous, current], next, |i, [before, now]| {
            let particle = now[i];
            if !particle.is_free() {
                return particle;
            }

            let acceleration = chain_acceleration(i, params, |j| {
                let position = now[j].position;
                (position, (position - before[j].position) / dt)
            });

            let position = particle.position + (particle.position - before[i].position)
                + acceleration * (dt * dt);

            ChainParticle {
                position,
                velocity: (position - particle.position) / dt,
                ..particle
            }
        });
        buffers.advance();
    }

    fn clone_box(&self) -> Box<dyn ChainIntegrator<S>> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DVec3;

    fn falling_params() -> ChainParams<f64> {
        ChainParams::new(3, 2.0, 0.1, 0.0, 0.0, 1.0, DVec3::new(0.0, -10.0, 0.0))
    }

    fn resting_chain() -> [ChainParticle<f64>; 3] {
        [
            ChainParticle::anchored(DVec3::ZERO),
            ChainParticle::free(DVec3::new(1.0, 0.0, 0.0)),
            ChainParticle::free(DVec3::new(2.0, 0.0, 0.0)),
        ]
    }

    #[test]
    fn test_bootstrap_synthesizes_previous_position() {
        let params = falling_params();
        let mut buffers = BufferSet::new(&resting_chain(), Buffering::Triple);
        Leapfrog.bootstrap(&mut buffers, &params);

        let previous = buffers.slot(buffers.previous_index());
        // ½ g dt² = ½ (-10) 0.01
        assert!((previous[1].position.y - (-0.05)).abs() < 1e-12);
        // Right edge is free but not interior; anchored left edge is untouched
        assert_eq!(previous[2].position, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(previous[0].position, DVec3::ZERO);
        assert_eq!(buffers.current(), &resting_chain());
    }

    #[test]
    fn test_free_fall_matches_constant_acceleration() {
        // With k = c = 0 every free particle falls under gravity alone.
        let params = falling_params();
        let mut buffers = BufferSet::new(&resting_chain(), Buffering::Triple);
        Leapfrog.bootstrap(&mut buffers, &params);

        for _ in 0..10 {
            Leapfrog.step(&mut buffers, &params);
        }

        // The synthesized p(-dt) makes Verlet reproduce p(t) = ½ g t² exactly
        let interior = buffers.current()[1];
        let t = 1.0;
        let expected = 0.5 * -10.0 * t * t;
        assert!((interior.position.y - expected).abs() < 1e-9);
        assert_eq!(buffers.current()[0].position, DVec3::ZERO);
    }

    #[test]
    fn test_properties() {
        assert_eq!(Leapfrog.name(), "leapfrog");
        assert_eq!(Leapfrog.order(), 2);
        assert_eq!(Leapfrog.buffering(), Buffering::Triple);
        assert!(Leapfrog.aliases().contains(&"verlet"));
    }
}
