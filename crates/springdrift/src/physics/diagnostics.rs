//! Conserved-quantity diagnostics computed from a read-only snapshot

use crate::physics::forces::ForceLaw;
use crate::physics::math::{Real, SimVector, Vector};
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::particles::{Body, ChainParticle};

/// Mechanical energy of a spring chain, split by source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainEnergy<S: Real> {
    pub kinetic: S,
    /// Elastic energy stored in the springs
    pub spring: S,
    /// Potential energy in the uniform field, relative to the origin
    pub gravitational: S,
}

impl<S: Real> ChainEnergy<S> {
    pub fn total(&self) -> S {
        self.kinetic + self.spring + self.gravitational
    }
}

/// Energy of a chain snapshot.
///
/// Anchored particles contribute no kinetic or gravitational term since they
/// never move.
pub fn chain_energy<S: Real>(particles: &[ChainParticle<S>], params: &ChainParams<S>) -> ChainEnergy<S> {
    let (kinetic, gravitational) = particles
        .iter()
        .filter(|particle| particle.is_free())
        .fold((S::ZERO, S::ZERO), |(kinetic, gravitational), particle| {
            (
                kinetic + S::HALF * params.mass * particle.velocity.length_squared(),
                gravitational - params.mass * params.gravity.dot(particle.position),
            )
        });

    let spring = particles
        .windows(2)
        .map(|pair| {
            let stretch = (pair[1].position - pair[0].position).length() - params.natural_length;
            S::HALF * params.spring_constant * stretch * stretch
        })
        .fold(S::ZERO, |total, energy| total + energy);

    ChainEnergy {
        kinetic,
        spring,
        gravitational,
    }
}

pub fn total_mass<S: Real>(bodies: &[Body<S>]) -> S {
    bodies.iter().fold(S::ZERO, |total, body| total + body.mass)
}

/// Total linear momentum `Σ m v`
pub fn total_momentum<S: Real>(bodies: &[Body<S>]) -> Vector<S> {
    bodies
        .iter()
        .fold(Vector::<S>::ZERO, |total, body| total + body.momentum())
}

/// Total kinetic energy `Σ ½ m v²`
pub fn kinetic_energy<S: Real>(bodies: &[Body<S>]) -> S {
    bodies.iter().fold(S::ZERO, |total, body| {
        total + S::HALF * body.mass * body.velocity.length_squared()
    })
}

/// Total pairwise potential energy under `law`
pub fn potential_energy<S: Real>(bodies: &[Body<S>], params: &NBodyParams<S>, law: ForceLaw) -> S {
    let mut total = S::ZERO;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            let distance = (b.position - a.position).length();
            total += law.pair_potential(
                params.gravitational_constant * a.mass * b.mass,
                distance,
                params.r_threshold,
            );
        }
    }
    total
}

/// Mass-weighted mean velocity, zero for a massless system
pub fn system_velocity<S: Real>(bodies: &[Body<S>]) -> Vector<S> {
    let mass = total_mass(bodies);
    if mass > S::ZERO {
        total_momentum(bodies) / mass
    } else {
        Vector::<S>::ZERO
    }
}
