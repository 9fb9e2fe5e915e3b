//! Parameter blocks handed to every step
//!
//! A parameter block is read-only for the duration of a step. Callers may
//! build a new one between steps (for example to vary `dt`).

use crate::physics::math::{Real, SimVector, Vector};

/// Physical constants of a damped spring chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParams<S: Real> {
    pub particle_count: usize,
    pub dt: S,
    /// Spring constant `k`
    pub spring_constant: S,
    /// Damping coefficient `c` applied to relative neighbor velocity
    pub damping: S,
    /// Mass of every particle
    pub mass: S,
    /// Uniform gravitational acceleration
    pub gravity: Vector<S>,
    /// Rest separation between adjacent particles
    pub natural_length: S,
}

impl<S: Real> ChainParams<S> {
    /// Build a parameter block, deriving the natural length as
    /// `total_length / (particle_count - 1)`.
    pub fn new(
        particle_count: usize,
        total_length: S,
        dt: S,
        spring_constant: S,
        damping: S,
        mass: S,
        gravity: Vector<S>,
    ) -> Self {
        let segments = particle_count.saturating_sub(1).max(1);
        Self {
            particle_count,
            dt,
            spring_constant,
            damping,
            mass,
            gravity,
            natural_length: total_length / S::from_usize(segments),
        }
    }

    pub fn with_dt(self, dt: S) -> Self {
        Self { dt, ..self }
    }

    pub fn with_gravity(self, gravity: Vector<S>) -> Self {
        Self { gravity, ..self }
    }

    /// Gravity used by the original rope scenes: `(0, -9.8 / N, 0)`
    pub fn scaled_gravity(particle_count: usize) -> Vector<S> {
        Vector::<S>::new(
            S::ZERO,
            S::from_f64(-9.8) / S::from_usize(particle_count.max(1)),
            S::ZERO,
        )
    }
}

/// Constants of the N-body gravitational system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NBodyParams<S: Real> {
    pub particle_count: usize,
    pub dt: S,
    pub gravitational_constant: S,
    /// Pairs closer than this contribute no force
    pub r_threshold: S,
}

impl<S: Real> NBodyParams<S> {
    pub fn new(particle_count: usize, dt: S, gravitational_constant: S, r_threshold: S) -> Self {
        Self {
            particle_count,
            dt,
            gravitational_constant,
            r_threshold,
        }
    }

    pub fn with_dt(self, dt: S) -> Self {
        Self { dt, ..self }
    }
}
