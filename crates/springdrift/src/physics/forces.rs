//! Force and acceleration evaluators
//!
//! Both evaluators are pure: they read a snapshot through an accessor and
//! return a vector, so the same code serves every scheme regardless of which
//! buffer or staging field holds the positions it should see.

use crate::physics::boundary::Site;
use crate::physics::math::{Real, SimVector, Vector};
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::particles::Body;

/// Force one neighbor's spring and damper exert on a chain particle
///
/// `f = (|Δp| - l) k normalize(Δp) - c (v_self - v_neighbor)` with
/// `Δp = p_neighbor - p_self`.
///
/// Neighbors must not coincide; the chain evaluator has no minimum-distance
/// guard and a zero separation yields a non-finite direction.
#[inline]
pub fn spring_force<S: Real>(
    position: Vector<S>,
    velocity: Vector<S>,
    neighbor_position: Vector<S>,
    neighbor_velocity: Vector<S>,
    params: &ChainParams<S>,
) -> Vector<S> {
    let delta = neighbor_position - position;
    let distance = delta.length();
    debug_assert!(
        distance > S::ZERO,
        "adjacent chain particles must not coincide"
    );

    delta.normalize() * ((distance - params.natural_length) * params.spring_constant)
        - (velocity - neighbor_velocity) * params.damping
}

/// Sum of spring forces on particle `index`
///
/// `state(j)` returns the `(position, velocity)` the scheme wants particle `j`
/// to be seen at.
#[inline]
pub fn chain_spring_force<S, F>(index: usize, params: &ChainParams<S>, state: F) -> Vector<S>
where
    S: Real,
    F: Fn(usize) -> (Vector<S>, Vector<S>),
{
    let (position, velocity) = state(index);

    Site::of(index, params.particle_count)
        .neighbors(index)
        .fold(Vector::<S>::ZERO, |total, neighbor| {
            let (neighbor_position, neighbor_velocity) = state(neighbor);
            total + spring_force(position, velocity, neighbor_position, neighbor_velocity, params)
        })
}

/// Total force including gravity, `F = Σf + m g`
#[inline]
pub fn chain_force<S, F>(index: usize, params: &ChainParams<S>, state: F) -> Vector<S>
where
    S: Real,
    F: Fn(usize) -> (Vector<S>, Vector<S>),
{
    chain_spring_force(index, params, state) + params.gravity * params.mass
}

/// Net acceleration `a = Σf / m + g`
#[inline]
pub fn chain_acceleration<S, F>(index: usize, params: &ChainParams<S>, state: F) -> Vector<S>
where
    S: Real,
    F: Fn(usize) -> (Vector<S>, Vector<S>),
{
    chain_spring_force(index, params, state) / params.mass + params.gravity
}

/// How pairwise attraction falls off with distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceLaw {
    /// `1 / r`, the law of a two-dimensional universe
    Planar,
    /// `1 / r²`
    InverseSquare,
}

impl ForceLaw {
    #[inline]
    fn falloff<S: Real>(self, distance: S) -> S {
        match self {
            ForceLaw::Planar => distance,
            ForceLaw::InverseSquare => distance * distance,
        }
    }

    /// Pair potential energy `U(r)` matching this law, clamped at `r_threshold`
    pub fn pair_potential<S: Real>(self, g_mi_mj: S, distance: S, r_threshold: S) -> S {
        let distance = distance.max(r_threshold);
        match self {
            ForceLaw::Planar => g_mi_mj * distance.ln(),
            ForceLaw::InverseSquare => -(g_mi_mj / distance),
        }
    }
}

/// Force body `j` exerts on body `i`
///
/// Zero when the separation is below `r_threshold`. The magnitude is built
/// from the symmetric product `g (m_i m_j)` so that swapping the pair negates
/// the result exactly.
#[inline]
pub fn pair_force<S: Real>(
    law: ForceLaw,
    position_i: Vector<S>,
    mass_i: S,
    position_j: Vector<S>,
    mass_j: S,
    params: &NBodyParams<S>,
) -> Vector<S> {
    let delta = position_j - position_i;
    let distance = delta.length();
    if distance < params.r_threshold {
        return Vector::<S>::ZERO;
    }

    delta.normalize() * (params.gravitational_constant * (mass_i * mass_j) / law.falloff(distance))
}

/// O(N) sum of pair forces on body `index`
///
/// `position_of` selects which position field of each body is used. Every
/// term comes from [`pair_force`], so the contribution of `j` on `i` is the
/// exact negation of the contribution of `i` on `j`.
#[inline]
pub fn gravity_force<S, F>(
    law: ForceLaw,
    index: usize,
    bodies: &[Body<S>],
    params: &NBodyParams<S>,
    position_of: F,
) -> Vector<S>
where
    S: Real,
    F: Fn(&Body<S>) -> Vector<S>,
{
    let body = &bodies[index];
    let position = position_of(body);

    bodies
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != index)
        .fold(Vector::<S>::ZERO, |total, (_, other)| {
            total + pair_force(law, position, body.mass, position_of(other), other.mass, params)
        })
}

/// Acceleration of body `index`: the summed pair forces divided once by its
/// mass, which must be positive.
#[inline]
pub fn gravity_acceleration<S, F>(
    law: ForceLaw,
    index: usize,
    bodies: &[Body<S>],
    params: &NBodyParams<S>,
    position_of: F,
) -> Vector<S>
where
    S: Real,
    F: Fn(&Body<S>) -> Vector<S>,
{
    gravity_force(law, index, bodies, params, position_of) / bodies[index].mass
}
