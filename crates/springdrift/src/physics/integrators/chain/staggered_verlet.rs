//! Single-pass staggered velocity Verlet for spring chains

use crate::physics::boundary::Site;
use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::chain_acceleration;
use crate::physics::integrators::{ChainIntegrator, Integrator};
use crate::physics::math::Real;
use crate::physics::params::ChainParams;
use crate::physics::particles::ChainParticle;

/// Velocity Verlet that keeps a one-step-ahead state in the staging fields.
///
/// `position_temp` holds the next position and `velocity_temp` the
/// half-kicked velocity. Each pass evaluates the acceleration at the staged
/// state, publishes it as the new authoritative state, and stages the step
/// after it:
///
/// ```text
/// a   = a(pt, vt)
/// p'  = pt
/// v'  = vt + a dt / 2
/// pt' = pt + v' dt + a dt² / 2
/// vt' = vt + a dt
/// ```
///
/// The published state lags the staged one by a step, in exchange for a
/// single kernel pass per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaggeredVerlet;

impl Integrator for StaggeredVerlet {
    fn name(&self) -> &'static str {
        "staggered_verlet"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["vver"]
    }

    fn order(&self) -> usize {
        2
    }

    fn buffering(&self) -> Buffering {
        Buffering::Triple
    }
}

impl<S: Real> ChainIntegrator<S> for StaggeredVerlet {
    /// `pt = p` everywhere. Free interior particles stage `vt = v - g dt / 2`
    /// so the first pass does not count the half gravity kick twice.
    fn bootstrap(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let half_dt = S::HALF * params.dt;
        let count = params.particle_count;
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| {
            let particle = state[i];
            let velocity_temp = if particle.is_free() && Site::of(i, count).is_interior() {
                particle.velocity - params.gravity * half_dt
            } else {
                particle.velocity
            };

            ChainParticle {
                position_temp: particle.position,
                velocity_temp,
                ..particle
            }
        });
        buffers.advance();
    }

    fn step(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let dt = params.dt;
        let half_dt = S::HALF * dt;
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| {
            let particle = state[i];
            if !particle.is_free() {
                return particle;
            }

            let acceleration = chain_acceleration(i, params, |j| {
                (state[j].position_temp, state[j].velocity_temp)
            });
            let velocity = particle.velocity_temp + acceleration * half_dt;

            ChainParticle {
                position: particle.position_temp,
                velocity,
                position_temp: particle.position_temp + velocity * dt + acceleration * (half_dt * dt),
                velocity_temp: particle.velocity_temp + acceleration * dt,
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

    fn falling() -> (ChainParams<f64>, [ChainParticle<f64>; 3]) {
        let params = ChainParams::new(3, 2.0, 0.1, 0.0, 0.0, 1.0, DVec3::new(0.0, -10.0, 0.0));
        let chain = [
            ChainParticle::anchored(DVec3::ZERO),
            ChainParticle::free(DVec3::new(1.0, 0.0, 0.0)),
            ChainParticle::anchored(DVec3::new(2.0, 0.0, 0.0)),
        ];
        (params, chain)
    }

    #[test]
    fn test_bootstrap_stages_half_gravity_kick() {
        let (params, chain) = falling();
        let mut buffers = BufferSet::new(&chain, Buffering::Triple);
        StaggeredVerlet.bootstrap(&mut buffers, &params);

        let staged = buffers.current();
        assert_eq!(staged[1].position_temp, staged[1].position);
        assert!((staged[1].velocity_temp.y - 0.5).abs() < 1e-12);
        assert_eq!(staged[0].velocity_temp, DVec3::ZERO);
    }

    #[test]
    fn test_published_state_lags_one_step() {
        let (params, chain) = falling();
        let mut buffers = BufferSet::new(&chain, Buffering::Triple);
        StaggeredVerlet.bootstrap(&mut buffers, &params);

        StaggeredVerlet.step(&mut buffers, &params);
        // First pass republishes the initial state
        let first = buffers.current()[1];
        assert!(first.position.y.abs() < 1e-12);
        assert!(first.velocity.y.abs() < 1e-12);

        for _ in 0..10 {
            StaggeredVerlet.step(&mut buffers, &params);
        }

        // After 11 passes the published state is t = 1.0 of a free fall
        let particle = buffers.current()[1];
        assert!((particle.position.y - (-5.0)).abs() < 1e-9);
        assert!((particle.velocity.y - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_properties() {
        assert_eq!(StaggeredVerlet.name(), "staggered_verlet");
        assert_eq!(StaggeredVerlet.aliases(), &["vver"]);
        assert_eq!(StaggeredVerlet.buffering(), Buffering::Triple);
    }
}
