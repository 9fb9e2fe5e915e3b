//! Two-pass velocity Verlet for spring chains

use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::chain_force;
use crate::physics::integrators::{ChainIntegrator, Integrator};
use crate::physics::math::Real;
use crate::physics::params::ChainParams;
use crate::physics::particles::ChainParticle;

/// Kick-drift-kick velocity Verlet split into two kernel passes per step.
///
/// Stage A drifts every position with the force stored by the previous step
/// and applies the first half kick:
///
/// ```text
/// p += v dt + F dt² / 2m
/// v += F dt / 2m
/// ```
///
/// Stage B evaluates the force at the drifted positions (and half-kicked
/// velocities, for the damper), stores it, and applies the second half kick.
/// Stage B cannot start until every particle has finished stage A.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn name(&self) -> &'static str {
        "velocity_verlet"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["vv"]
    }

    fn order(&self) -> usize {
        2
    }

    fn buffering(&self) -> Buffering {
        Buffering::Double
    }
}

impl VelocityVerlet {
    fn store_forces<S: Real>(buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| ChainParticle {
            force: chain_force(i, params, |j| (state[j].position, state[j].velocity)),
            ..state[i]
        });
        buffers.advance();
    }
}

impl<S: Real> ChainIntegrator<S> for VelocityVerlet {
    /// Store the force of the initial configuration for the first drift.
    fn bootstrap(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        Self::store_forces(buffers, params);
    }

    fn step(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>) {
        let dt = params.dt;
        let half_kick = dt / (S::TWO * params.mass);

        let (current, next) = (buffers.current_index(), buffers.next_index());
        buffers.dispatch([current], next, |i, [state]| {
            let particle = state[i];
            if !particle.is_free() {
                return particle;
            }

            ChainParticle {
                position: particle.position + particle.velocity * dt + particle.force * (dt * half_kick),
                velocity: particle.velocity + particle.force * half_kick,
                ..particle
            }
        });
        buffers.advance();

        let (current, next) = (buffers.current_index(), buffers.next_index());
        buffers.dispatch([current], next, |i, [state]| {
            let particle = state[i];
            let force = chain_force(i, params, |j| (state[j].position, state[j].velocity));
            if !particle.is_free() {
                return ChainParticle { force, ..particle };
            }

            ChainParticle {
                velocity: particle.velocity + force * half_kick,
                force,
                ..particle
            }
        });
        buffers.advance();
    }

    fn clone_box(&self) -> Box<dyn ChainIntegrator<S>> {
        Box::new(*self)
    }
}
