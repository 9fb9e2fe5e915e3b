//! Multi-pass Runge-Kutta family for N-body systems
//!
//! All three schemes share one pass kernel over three buffers. The front slot
//! holds the original state `O` and stays read-only until the final pass. The
//! other two slots alternate as the provisional stage `C` being read and the
//! stage `N` being written. A pass with coefficients `(x1, x2)` computes
//!
//! ```text
//! a    = a(C.p)
//! N.v  = O.v  + x1 dt a        N.p  = O.p  + x1 dt C.v
//! N.vt = C.vt + x2 dt a        N.pt = C.pt + x2 dt C.v
//! ```
//!
//! so `(p, v)` carries the next stage's evaluation point and `(pt, vt)`
//! accumulates the weighted sum of stage derivatives. The finishing pass adds
//! the last weighted derivative to the accumulator and writes the result back
//! into the original slot, which therefore stays the front across steps.

use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::{ForceLaw, gravity_acceleration};
use crate::physics::integrators::{Integrator, NBodyIntegrator};
use crate::physics::math::Real;
use crate::physics::params::NBodyParams;
use crate::physics::particles::Body;

/// Stage coefficients of an explicit Runge-Kutta scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tableau {
    /// `(x_dt1, x_dt2)` for each intermediate pass
    pub passes: &'static [(f64, f64)],
    /// Weight of the final stage derivative
    pub finish: f64,
}

pub const MIDPOINT_TABLEAU: Tableau = Tableau {
    passes: &[(0.5, 0.0)],
    finish: 1.0,
};

pub const HEUN_TABLEAU: Tableau = Tableau {
    passes: &[(1.0, 0.5)],
    finish: 0.5,
};

pub const FOURTH_ORDER_TABLEAU: Tableau = Tableau {
    passes: &[(0.5, 1.0 / 6.0), (0.5, 1.0 / 3.0), (1.0, 1.0 / 3.0)],
    finish: 1.0 / 6.0,
};

/// Copy every body's state into its staging fields.
fn sync_staging<S: Real>(buffers: &mut BufferSet<Body<S>>) {
    let (current, next) = (buffers.current_index(), buffers.next_index());
    buffers.dispatch([current], next, |i, [state]| state[i].synced());
    buffers.advance();
}

/// Run every pass of `tableau` for one physical step.
pub fn run_tableau<S: Real>(
    tableau: &Tableau,
    buffers: &mut BufferSet<Body<S>>,
    params: &NBodyParams<S>,
) {
    debug_assert_eq!(buffers.buffering(), Buffering::Triple);

    let dt = params.dt;
    let original = buffers.current_index();
    let scratch = [buffers.index_after_front(1), buffers.index_after_front(2)];
    let mut read = original;

    for (pass, &(x1, x2)) in tableau.passes.iter().enumerate() {
        let write = scratch[pass % 2];
        let (step1, step2) = (S::from_f64(x1) * dt, S::from_f64(x2) * dt);

        buffers.dispatch([original, read], write, |i, [origin, stage]| {
            let body = stage[i];
            let acceleration =
                gravity_acceleration(ForceLaw::Planar, i, stage, params, |other| other.position);

            Body {
                mass: body.mass,
                position: origin[i].position + body.velocity * step1,
                velocity: origin[i].velocity + acceleration * step1,
                position_temp: body.position_temp + body.velocity * step2,
                velocity_temp: body.velocity_temp + acceleration * step2,
            }
        });
        read = write;
    }

    let weight = S::from_f64(tableau.finish) * dt;
    buffers.dispatch([read], original, |i, [stage]| {
        let body = stage[i];
        let acceleration =
            gravity_acceleration(ForceLaw::Planar, i, stage, params, |other| other.position);

        Body::new(
            body.mass,
            body.position_temp + body.velocity * weight,
            body.velocity_temp + acceleration * weight,
        )
    });
}

macro_rules! runge_kutta_scheme {
    ($(#[$doc:meta])* $ty:ident, $name:literal, [$($alias:literal),*], $order:literal, $tableau:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl $ty {
            pub const TABLEAU: Tableau = $tableau;
        }

        impl Integrator for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn aliases(&self) -> &'static [&'static str] {
                &[$($alias),*]
            }

            fn order(&self) -> usize {
                $order
            }

            fn buffering(&self) -> Buffering {
                Buffering::Triple
            }
        }

        impl<S: Real> NBodyIntegrator<S> for $ty {
            fn force_law(&self) -> ForceLaw {
                ForceLaw::Planar
            }

            fn bootstrap(&self, buffers: &mut BufferSet<Body<S>>, _params: &NBodyParams<S>) {
                sync_staging(buffers);
            }

            fn step(&self, buffers: &mut BufferSet<Body<S>>, params: &NBodyParams<S>) {
                run_tableau(&Self::TABLEAU, buffers, params);
            }

            fn clone_box(&self) -> Box<dyn NBodyIntegrator<S>> {
                Box::new(*self)
            }
        }
    };
}

runge_kutta_scheme!(
    /// Explicit midpoint rule, one provisional pass
    Midpoint,
    "midpoint",
    ["rk2"],
    2,
    MIDPOINT_TABLEAU
);

runge_kutta_scheme!(
    /// Heun's method (improved Euler), one provisional pass
    Heun,
    "heun",
    ["improved_euler"],
    2,
    HEUN_TABLEAU
);

runge_kutta_scheme!(
    /// Classic fourth-order Runge-Kutta, three provisional passes
    RungeKuttaFourthOrder,
    "runge_kutta_fourth_order",
    ["rk4"],
    4,
    FOURTH_ORDER_TABLEAU
);

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DVec3;

    /// Single body in a fixed planar field from a massive partner that the
    /// test keeps pinned by giving it a huge mass.
    fn heavy_pair() -> ([Body<f64>; 2], NBodyParams<f64>) {
        let bodies = [
            Body::new(1.0, DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 0.3, 0.0)),
            Body::new(1.0e6, DVec3::ZERO, DVec3::ZERO),
        ];
        (bodies, NBodyParams::new(2, 1.0e-3, 1.0e-6, 1.0e-3))
    }

    fn reference_step(body: Body<f64>, dt: f64, tableau: &Tableau) -> (DVec3, DVec3) {
        // Hand-rolled explicit RK using the same coefficients, with the
        // heavy partner held fixed at the origin (mass·g = 1).
        let derivative = |p: DVec3, v: DVec3| (v, -p.normalize() / p.length());
        let (mut stage_p, mut stage_v) = (body.position, body.velocity);
        let (mut sum_p, mut sum_v) = (body.position, body.velocity);
        for &(x1, x2) in tableau.passes {
            let (dp, dv) = derivative(stage_p, stage_v);
            sum_p += dp * (x2 * dt);
            sum_v += dv * (x2 * dt);
            stage_p = body.position + dp * (x1 * dt);
            stage_v = body.velocity + dv * (x1 * dt);
        }
        let (dp, dv) = derivative(stage_p, stage_v);
        (sum_p + dp * (tableau.finish * dt), sum_v + dv * (tableau.finish * dt))
    }

    fn check_against_reference<I: NBodyIntegrator<f64>>(scheme: I, tableau: &Tableau) {
        let (bodies, params) = heavy_pair();
        let mut buffers = BufferSet::new(&bodies, scheme.buffering());
        scheme.bootstrap(&mut buffers, &params);
        scheme.step(&mut buffers, &params);

        let (position, velocity) = reference_step(bodies[0], params.dt, tableau);
        let light = buffers.current()[0];
        assert!((light.position - position).length() < 1e-9);
        assert!((light.velocity - velocity).length() < 1e-9);
        assert_eq!(light.position_temp, light.position);
        assert_eq!(light.velocity_temp, light.velocity);
    }

    #[test]
    fn test_midpoint_matches_reference() {
        check_against_reference(Midpoint, &MIDPOINT_TABLEAU);
    }

    #[test]
    fn test_heun_matches_reference() {
        check_against_reference(Heun, &HEUN_TABLEAU);
    }

    #[test]
    fn test_rk4_matches_reference() {
        check_against_reference(RungeKuttaFourthOrder, &FOURTH_ORDER_TABLEAU);
    }

    #[test]
    fn test_original_slot_stays_in_front() {
        let (bodies, params) = heavy_pair();
        let mut buffers = BufferSet::new(&bodies, Buffering::Triple);
        RungeKuttaFourthOrder.bootstrap(&mut buffers, &params);
        let front = buffers.current_index();
        for _ in 0..3 {
            RungeKuttaFourthOrder.step(&mut buffers, &params);
        }
        assert_eq!(buffers.current_index(), front);
    }

    #[test]
    fn test_tableau_weights_sum_to_one() {
        for tableau in [MIDPOINT_TABLEAU, HEUN_TABLEAU, FOURTH_ORDER_TABLEAU] {
            let total: f64 = tableau.passes.iter().map(|&(_, x2)| x2).sum::<f64>() + tableau.finish;
            assert!((total - 1.0).abs() < 1e-15);
        }
    }
}
