//! Staged velocity Verlet for N-body systems

use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::{ForceLaw, gravity_acceleration};
use crate::physics::integrators::{Integrator, NBodyIntegrator};
use crate::physics::math::Real;
use crate::physics::params::NBodyParams;
use crate::physics::particles::Body;

/// Velocity Verlet with the next position staged in `position_temp`.
///
/// Each body carries `pt = p(t + dt)` and `vt = v(t) + a(t) dt / 2`. One pass
/// evaluates `a(t + dt)` at the staged positions and
///
/// ```text
/// p'  = pt
/// v'  = vt + a dt / 2
/// pt' = pt + v' dt + a dt² / 2
/// vt' = vt + a dt
/// ```
///
/// The same scheme is offered for both force laws; they are registered under
/// separate names because the law is part of the simulated system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityVerlet {
    law: ForceLaw,
}

impl VelocityVerlet {
    pub const PLANAR: Self = Self {
        law: ForceLaw::Planar,
    };

    pub const INVERSE_SQUARE: Self = Self {
        law: ForceLaw::InverseSquare,
    };

    pub fn with_law(law: ForceLaw) -> Self {
        Self { law }
    }
}

impl Default for VelocityVerlet {
    fn default() -> Self {
        Self::PLANAR
    }
}

impl Integrator for VelocityVerlet {
    fn name(&self) -> &'static str {
        match self.law {
            ForceLaw::Planar => "velocity_verlet",
            ForceLaw::InverseSquare => "velocity_verlet_inverse_square",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self.law {
            ForceLaw::Planar => &["vv", "vver"],
            ForceLaw::InverseSquare => &["vver2", "inverse_square"],
        }
    }

    fn order(&self) -> usize {
        2
    }

    fn buffering(&self) -> Buffering {
        Buffering::Double
    }
}

impl<S: Real> NBodyIntegrator<S> for VelocityVerlet {
    fn force_law(&self) -> ForceLaw {
        self.law
    }

    /// Stage `pt = p + v dt + a dt² / 2` and `vt = v + a dt / 2` from `a(p)`.
    fn bootstrap(&self, buffers: &mut BufferSet<Body<S>>, params: &NBodyParams<S>) {
        let law = self.law;
        let dt = params.dt;
        let half_dt = S::HALF * dt;
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| {
            let body = state[i];
            let acceleration = gravity_acceleration(law, i, state, params, |other| other.position);

            Body {
                position_temp: body.position + body.velocity * dt + acceleration * (half_dt * dt),
                velocity_temp: body.velocity + acceleration * half_dt,
                ..body
            }
        });
        buffers.advance();
    }

    fn step(&self, buffers: &mut BufferSet<Body<S>>, params: &NBodyParams<S>) {
        let law = self.law;
        let dt = params.dt;
        let half_dt = S::HALF * dt;
        let (current, next) = (buffers.current_index(), buffers.next_index());

        buffers.dispatch([current], next, |i, [state]| {
            let body = state[i];
            let acceleration =
                gravity_acceleration(law, i, state, params, |other| other.position_temp);
            let velocity = body.velocity_temp + acceleration * half_dt;

            Body {
                mass: body.mass,
                position: body.position_temp,
                velocity,
                position_temp: body.position_temp + velocity * dt + acceleration * (half_dt * dt),
                velocity_temp: body.velocity_temp + acceleration * dt,
            }
        });
        buffers.advance();
    }

    fn clone_box(&self) -> Box<dyn NBodyIntegrator<S>> {
        Box::new(*self)
    }
}
