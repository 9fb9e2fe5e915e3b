//! Forward Euler for N-body systems

use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::{ForceLaw, gravity_acceleration};
use crate::physics::integrators::{Integrator, NBodyIntegrator};
use crate::physics::math::Real;
use crate::physics::params::NBodyParams;
use crate::physics::particles::Body;

/// Naive explicit Euler under the planar law
///
/// ```text
/// v' = v + a(p) dt
/// p' = p + v dt
/// ```
///
/// Orbits spiral outwards; kept as a baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn name(&self) -> &'static str {
        "forward_euler"
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

impl<S: Real> NBodyIntegrator<S> for ForwardEuler {
    fn force_law(&self) -> ForceLaw {
        ForceLaw::Planar
    }

    fn bootstrap(&self, buffers: &mut BufferSet<Body<S>>, _params: &NBodyParams<S>) {
        let (current, next) = (buffers.current_index(), buffers.next_index());
        buffers.dispatch([current], next, |i, [state]| state[i].synced());
        buffers.advance();
    }

    fn step(&self, buffers: &mut BufferSet<Body<S>>, params: &NBodyParams<S>) {
        let dt = params.dt;
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| {
            let body = state[i];
            let acceleration =
                gravity_acceleration(ForceLaw::Planar, i, state, params, |other| other.position);

            Body {
                position: body.position + body.velocity * dt,
                velocity: body.velocity + acceleration * dt,
                ..body
            }
            .synced()
        });
        buffers.advance();
    }

    fn clone_box(&self) -> Box<dyn NBodyIntegrator<S>> {
        Box::new(*self)
    }
}
