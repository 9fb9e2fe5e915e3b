//! Semi-implicit Euler for spring chains

use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::chain_acceleration;
use crate::physics::integrators::{ChainIntegrator, Integrator};
use crate::physics::math::Real;
use crate::physics::params::ChainParams;
use crate::physics::particles::ChainParticle;

/// First-order Euler step over a ping-pong buffer pair.
///
/// The position advances with the velocity from the start of the step:
///
/// ```text
/// p' = p + v dt
/// v' = v + a(p, v) dt
/// ```
///
/// This is the naive explicit ordering. Its energy grows steadily on an
/// undamped chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn name(&self) -> &'static str {
        "semi_implicit_euler"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["euler"]
    }

    fn order(&self) -> usize {
        1
    }

    fn buffering(&self) -> Buffering {
        Buffering::Double
    }
}

impl<S: Real> ChainIntegrator<S> for SemiImplicitEuler {
    fn step(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let dt = params.dt;
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| {
            let particle = state[i];
            if !particle.is_free() {
                return particle;
            }

            let acceleration =
                chain_acceleration(i, params, |j| (state[j].position, state[j].velocity));

            ChainParticle {
                position: particle.position + particle.velocity * dt,
                velocity: particle.velocity + acceleration * dt,
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

    #[test]
    fn test_single_free_particle_under_gravity() {
        let params = ChainParams::<f64>::new(2, 1.0, 0.1, 0.0, 0.0, 1.0, DVec3::new(0.0, -10.0, 0.0));
        let initial = [
            ChainParticle::anchored(DVec3::ZERO),
            ChainParticle::free(DVec3::new(1.0, 0.0, 0.0)).with_velocity(DVec3::new(0.0, 2.0, 0.0)),
        ];
        let mut buffers = BufferSet::new(&initial, Buffering::Double);

        SemiImplicitEuler.step(&mut buffers, &params);

        let moved = buffers.current()[1];
        // Position uses the pre-update velocity
        assert!((moved.position.y - 0.2).abs() < 1e-12);
        assert!((moved.velocity.y - 1.0).abs() < 1e-12);
        assert_eq!(buffers.current()[0], initial[0]);
    }

    #[test]
    fn test_properties() {
        assert_eq!(SemiImplicitEuler.name(), "semi_implicit_euler");
        assert_eq!(SemiImplicitEuler.order(), 1);
        assert_eq!(SemiImplicitEuler.buffering(), Buffering::Double);
        assert_eq!(SemiImplicitEuler.aliases(), &["euler"]);
    }
}
